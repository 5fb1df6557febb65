//! Rules that run for every vertical.

use std::collections::BTreeMap;

use sitegrid_core::{
    Client, CompetitorProfile, DataPoints, Finding, FindingCategory, FindingType, Severity,
};

use super::{domains, matching, mean, share_at_least, Rule};

pub(super) const RULES: &[Rule] = &[
    Rule::new("backlink_gap", backlink_gap),
    Rule::new("review_gap", review_gap),
    Rule::new("content_depth", content_depth),
    Rule::new("grid_ranking", grid_ranking),
    Rule::new("chat_widget", chat_widget),
    Rule::new("blog_activity", blog_activity),
];

const LEADER_AUTHORITY_RATIO: f64 = 1.5;
const DEEP_PAGE_WORDS: usize = 1500;
const DOMINANT_RANK: f64 = 3.0;
const CHAT_ADOPTERS: usize = 2;
const BLOG_SHARE: f64 = 0.3;
const HIGH_RATING: f64 = 4.5;

fn backlink_gap(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let rated: Vec<(&CompetitorProfile, f64)> = competitors
        .iter()
        .filter_map(|c| {
            c.backlinks
                .domain_authority
                .filter(|da| *da > 0)
                .map(|da| (c, f64::from(da)))
        })
        .collect();
    let values: Vec<f64> = rated.iter().map(|(_, da)| *da).collect();
    let Some(average) = mean(&values) else {
        return Vec::new();
    };

    let competitor_values: BTreeMap<String, f64> = rated
        .iter()
        .map(|(c, da)| (c.domain.clone(), *da))
        .collect();
    let mut findings = vec![Finding::new(
        "backlink_gap",
        FindingType::Pattern,
        FindingCategory::Backlinks,
        Severity::High,
        format!("Average competitor domain authority: {average:.0}"),
    )
    .with_data_points(DataPoints {
        benchmark: Some(average),
        competitor_values,
        ..DataPoints::default()
    })];

    if rated.len() > 1 {
        if let Some((leader, authority)) = rated.iter().max_by(|a, b| a.1.total_cmp(&b.1)) {
            if *authority >= average * LEADER_AUTHORITY_RATIO {
                findings.push(
                    Finding::new(
                        "backlink_gap",
                        FindingType::Threat,
                        FindingCategory::Backlinks,
                        Severity::High,
                        format!(
                            "{} leads on authority ({authority:.0} vs. average {average:.0})",
                            leader.domain
                        ),
                    )
                    .with_competitors(vec![leader.domain.clone()]),
                );
            }
        }
    }
    findings
}

/// Client reviews against the competitor average and maximum.
fn review_gap(client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let reviewed: Vec<(&CompetitorProfile, f64)> = competitors
        .iter()
        .filter_map(|c| {
            c.trust_signals
                .review_count
                .filter(|n| *n > 0)
                .map(|n| (c, f64::from(n)))
        })
        .collect();
    let counts: Vec<f64> = reviewed.iter().map(|(_, n)| *n).collect();
    let mut findings = Vec::new();

    if let Some(average) = mean(&counts) {
        let max = counts.iter().copied().fold(0.0, f64::max);
        let ours = f64::from(client.review_count());

        if ours < average {
            let severity = if ours < average * 0.5 {
                Severity::High
            } else {
                Severity::Medium
            };
            findings.push(
                Finding::new(
                    "review_gap",
                    FindingType::Gap,
                    FindingCategory::Trust,
                    severity,
                    format!("Review count ({ours:.0}) below competitor average ({average:.0})"),
                )
                .with_data_points(DataPoints {
                    our_value: Some(ours),
                    benchmark: Some(average),
                    delta: Some(ours - average),
                    ..DataPoints::default()
                }),
            );
        } else if ours > max {
            findings.push(
                Finding::new(
                    "review_gap",
                    FindingType::Strength,
                    FindingCategory::Trust,
                    Severity::Low,
                    format!("Review count ({ours:.0}) leads all competitors (max: {max:.0})"),
                )
                .with_data_points(DataPoints {
                    our_value: Some(ours),
                    benchmark: Some(max),
                    ..DataPoints::default()
                }),
            );
        }

        for (competitor, count) in reviewed.iter().filter(|(_, n)| *n > average) {
            findings.push(
                Finding::new(
                    "review_gap",
                    FindingType::Strength,
                    FindingCategory::Trust,
                    Severity::Medium,
                    format!(
                        "{} has {count:.0} reviews, above the competitor average ({average:.0})",
                        competitor.domain
                    ),
                )
                .with_competitors(vec![competitor.domain.clone()])
                .with_data_points(DataPoints {
                    benchmark: Some(average),
                    competitor_values: BTreeMap::from([(competitor.domain.clone(), *count)]),
                    ..DataPoints::default()
                }),
            );
        }
    }

    let ratings: Vec<f64> = competitors
        .iter()
        .filter_map(|c| c.trust_signals.rating)
        .filter(|r| *r > 0.0)
        .collect();
    if let Some(average_rating) = mean(&ratings) {
        if average_rating >= HIGH_RATING {
            findings.push(Finding::new(
                "review_gap",
                FindingType::Pattern,
                FindingCategory::Trust,
                Severity::Medium,
                format!("Competitors average a {average_rating:.1}-star rating"),
            ));
        }
    }

    findings
}

fn content_depth(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    competitors
        .iter()
        .filter_map(|c| {
            let deepest = c
                .seo_structure
                .service_pages
                .iter()
                .filter_map(|p| p.word_count)
                .max()?;
            (deepest > DEEP_PAGE_WORDS).then(|| {
                Finding::new(
                    "content_depth",
                    FindingType::Pattern,
                    FindingCategory::Content,
                    Severity::Medium,
                    format!("{} has in-depth service pages ({deepest} words)", c.domain),
                )
                .with_competitors(vec![c.domain.clone()])
            })
        })
        .collect()
}

/// A competitor averaging top-3 across the grid dominates the local pack.
fn grid_ranking(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    competitors
        .iter()
        .filter_map(|c| {
            let average = c.average_rank()?;
            (average <= DOMINANT_RANK).then(|| {
                Finding::new(
                    "grid_ranking",
                    FindingType::Threat,
                    FindingCategory::LocalSeo,
                    Severity::Critical,
                    format!("{} dominates local results (avg rank: {average:.1})", c.domain),
                )
                .with_competitors(vec![c.domain.clone()])
                .with_data_points(DataPoints {
                    competitor_values: BTreeMap::from([(c.domain.clone(), average)]),
                    ..DataPoints::default()
                })
            })
        })
        .collect()
}

fn chat_widget(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let with_chat = matching(competitors, |c| c.conversion_mechanics.chat_widget);
    if with_chat.len() < CHAT_ADOPTERS {
        return Vec::new();
    }
    vec![Finding::new(
        "chat_widget",
        FindingType::Opportunity,
        FindingCategory::Conversion,
        Severity::Medium,
        format!("{} competitors offer live chat", with_chat.len()),
    )
    .with_competitors(domains(&with_chat))]
}

fn blog_activity(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let blogging = matching(competitors, |c| c.seo_structure.blog_active);
    if blogging.is_empty() || !share_at_least(blogging.len(), competitors.len(), BLOG_SHARE) {
        return Vec::new();
    }
    vec![Finding::new(
        "blog_activity",
        FindingType::Opportunity,
        FindingCategory::Content,
        Severity::Medium,
        format!(
            "{}/{} competitors maintain active blogs",
            blogging.len(),
            competitors.len()
        ),
    )
    .with_competitors(domains(&blogging))]
}
