//! Deterministic synthesis of research into document personalization
//!
//! Both steps are pure table lookups: a topic's sentence is included only
//! when that topic answered successfully. Placeholder entries left by failed
//! or timed-out topics never contribute.

pub mod adaptation;
pub mod personalization;

pub use adaptation::{adapt, AdaptedContent};
pub use personalization::{synthesize, PersonalizationBundle};

use crate::research::{Topic, WeightedResearchSet};

/// Sentence contributed by one topic
#[derive(Debug, Clone, Copy)]
pub(crate) struct TopicSentence {
    pub topic: Topic,
    pub sentence: &'static str,
}

pub(crate) const fn rule(topic: Topic, sentence: &'static str) -> TopicSentence {
    TopicSentence { topic, sentence }
}

/// Whether `topic` answered, looked up in the set its catalog belongs to
pub(crate) fn answered(
    client: &WeightedResearchSet,
    service: &WeightedResearchSet,
    topic: Topic,
) -> bool {
    if topic.is_client_topic() {
        client.is_ok(topic)
    } else {
        service.is_ok(topic)
    }
}

/// Sentences of `rules` whose topic answered, in table order
pub(crate) fn collect(
    rules: &[TopicSentence],
    client: &WeightedResearchSet,
    service: &WeightedResearchSet,
    subject: &str,
) -> Vec<String> {
    rules
        .iter()
        .filter(|r| answered(client, service, r.topic))
        .map(|r| r.sentence.replace("{subject}", subject))
        .collect()
}

/// Personalization bundle and adapted content for one pair of research sets
pub fn synthesize_all(
    client: &WeightedResearchSet,
    service: &WeightedResearchSet,
    subject: &str,
    service_label: &str,
) -> (PersonalizationBundle, AdaptedContent) {
    let bundle = synthesize(client, service, subject, service_label);
    let adapted = adapt(&bundle, client, service);
    (bundle, adapted)
}
