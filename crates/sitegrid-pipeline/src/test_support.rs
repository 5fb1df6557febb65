//! Shared fixtures for unit tests across the pipeline stages.

use sitegrid_core::{parse_client, Client, CompetitorProfile, Vertical};

pub(crate) const SAMPLE_CLIENT: &str = r#"
id: dent-sorcery
name: Dent Sorcery
domain: https://www.dentsorcery.com/
vertical: pdr
brand:
  tagline: Dents vanish, paint stays
contact:
  phone: (610) 555-0199
  email: hello@dentsorcery.com
  address: 12 Main St, Bethlehem, PA
services:
  - id: pdr
    name: Paintless Dent Repair
    description: Massaging dents out from behind the panel without repainting.
    is_money_service: true
    keywords: [paintless dent repair, pdr, dent removal]
    synonyms: [dent repair]
    faq_topics: [cost, insurance]
    defined_variables:
      time_range: 1-3 hours
      cost_range: $75-$450
      process_steps: [Assess the dent, Access the panel, Massage the metal]
      best_for: [door dings, hail dents]
  - id: hail
    name: Hail Damage Repair
    is_money_service: true
  - id: door-ding
    name: Door Ding Removal
    parent_service_id: pdr
locations:
  - id: bethlehem
    name: Bethlehem, PA
    geo_bucket: "0-10"
    is_primary: true
  - id: easton
    name: Easton, PA
    geo_bucket: "0-10"
  - id: allentown
    name: Allentown, PA
    geo_bucket: "10-30"
gbp_profile:
  rating: 4.6
  review_count: 20
"#;

pub(crate) fn sample_client() -> Client {
    parse_client(SAMPLE_CLIENT).expect("sample client should parse")
}

pub(crate) fn client_for(vertical: Vertical) -> Client {
    let mut client = sample_client();
    client.vertical = vertical;
    client
}

pub(crate) fn with_reviews(mut client: Client, reviews: u32, rating: f64) -> Client {
    let profile = client.gbp_profile.get_or_insert_with(Default::default);
    profile.review_count = Some(reviews);
    profile.rating = Some(rating);
    client
}

pub(crate) fn competitor(domain: &str) -> CompetitorProfile {
    let mut profile = CompetitorProfile::empty(domain);
    profile.confidence_score = 0.8;
    profile
}

pub(crate) fn competitor_with_reviews(domain: &str, reviews: u32) -> CompetitorProfile {
    let mut profile = competitor(domain);
    profile.trust_signals.review_count = Some(reviews);
    profile
}
