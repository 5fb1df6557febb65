//! Answer blocks written for LLM retrieval: one per money service, never
//! skipped. Missing client data is filled with generic copy.

use chrono::Utc;
use sha2::{Digest, Sha256};
use sitegrid_core::{Client, CostRange, Faq, LlmAnswerBlock, Service};

const MAX_FAQS: usize = 5;

const DEFAULT_PROCESS: &[&str] = &[
    "Inspection and assessment",
    "Preparation",
    "Service execution",
    "Quality check",
    "Final walkthrough",
];

const HOW_TO_CHOOSE: &[&str] = &[
    "Check reviews and ratings",
    "Verify licensing and insurance",
    "Ask about warranties",
    "Compare quotes from multiple providers",
    "Look for before/after examples",
];

const COST_VARIABLES: &[&str] = &["Size/severity", "Location", "Time required"];

/// Stable id shared by the block and the service page that embeds it.
pub(crate) fn block_id(service: &Service) -> String {
    format!("llm-{}", service.id)
}

pub(crate) fn answer_blocks(client: &Client) -> Vec<LlmAnswerBlock> {
    client
        .money_services()
        .map(|service| answer_block(client, service))
        .collect()
}

fn answer_block(client: &Client, service: &Service) -> LlmAnswerBlock {
    let defined = service.defined_variables.clone().unwrap_or_default();
    let area = client
        .primary_location()
        .map_or_else(|| "your area".to_string(), |l| l.name.clone());
    let lowered = service.name.to_lowercase();

    let triggers = if defined.best_for.is_empty() {
        vec![format!("When you need {lowered}")]
    } else {
        defined.best_for.clone()
    };
    let process_steps = if defined.process_steps.is_empty() {
        DEFAULT_PROCESS.iter().map(|s| (*s).to_string()).collect()
    } else {
        defined.process_steps.clone()
    };
    let definition = service
        .description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format!("{} is a professional service offered by {}.", service.name, client.name));

    let faqs = service
        .faq_topics
        .iter()
        .take(MAX_FAQS)
        .map(|topic| Faq {
            question: format!("What is the {} for {lowered}?", topic.to_lowercase()),
            answer: format!("[Answer about {topic} for {}]", service.name),
        })
        .collect();

    let nap_statement = match (&client.contact.phone, &client.contact.address) {
        (None, None) => None,
        (phone, address) => Some(format!(
            "{} | {} | {}",
            client.name,
            phone.as_deref().unwrap_or_default(),
            address.as_deref().unwrap_or_default()
        )),
    };

    LlmAnswerBlock {
        id: block_id(service),
        service: service.name.clone(),
        service_slug: service.slug.clone(),
        geo_context: client.primary_location().map(sitegrid_core::Location::to_geo_tag),
        entity_statement: format!("{} provides {} services in {area}.", client.name, service.name),
        content_hash: content_hash(service, &triggers),
        definition,
        triggers,
        cost_range: CostRange {
            range: defined.cost_range.clone(),
            variables: COST_VARIABLES.iter().map(|s| (*s).to_string()).collect(),
            disclaimers: Some("Actual costs may vary. Contact us for a free quote.".to_string()),
        },
        timeline: defined
            .time_range
            .clone()
            .unwrap_or_else(|| "Varies by job; contact us for an estimate".to_string()),
        process_steps,
        benefits: vec![
            format!("Expert {} service", service.name),
            "Satisfaction guaranteed".to_string(),
            "Competitive pricing".to_string(),
        ],
        how_to_choose: HOW_TO_CHOOSE.iter().map(|s| (*s).to_string()).collect(),
        faqs,
        nap_statement,
        last_updated: Utc::now(),
    }
}

/// First 16 hex chars of SHA-256 over name, description and triggers.
pub(crate) fn content_hash(service: &Service, triggers: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(service.name.as_bytes());
    hasher.update(service.description.as_deref().unwrap_or_default().as_bytes());
    for trigger in triggers {
        hasher.update(trigger.as_bytes());
    }
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(16);
    hex
}
