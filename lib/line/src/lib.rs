//! # featx Line
//!
//! A ready-made visitor rendering examples in the learning engine's text
//! input format:
//!
//! ```text
//! 1 |user Age:30 CitySeattle |emb 0:0.5 1:0.25
//! ```
//!
//! Only rendering is provided; parsing the format is left to the engine.

pub mod config;
pub mod visitor;

pub use config::LineConfig;
pub use visitor::{escape, LineVisitor};

use featx_core::{Record, Result};
use featx_serializer::{serializer, BoundSerializer};

/// Render `record` with the default configuration
pub fn to_line<R: Record>(record: &R) -> Result<String> {
    to_line_with(record, LineConfig::default())
}

pub fn to_line_with<R: Record>(record: &R, config: LineConfig) -> Result<String> {
    let compiled = serializer::<R, LineVisitor>()?;
    Ok(compiled.serialize(record, &mut LineVisitor::new(config)))
}

/// Line writer reusing one visitor for many records
pub fn line_writer<R: Record>(config: LineConfig) -> Result<BoundSerializer<R, LineVisitor>> {
    BoundSerializer::create(LineVisitor::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use featx_core::{Describe, FeatureAttr, SimpleLabel};

    struct Listing {
        label: Option<SimpleLabel>,
        age: i32,
        city: String,
        title: String,
        verified: bool,
        archived: bool,
        tags: Vec<String>,
        counts: Vec<u8>,
        coupon: Option<String>,
        embedding: [f32; 3],
    }

    impl Record for Listing {
        fn describe<D: Describe<Self>>(d: &mut D) {
            d.label(|l: &Listing| l.label.as_ref());
            d.field(FeatureAttr::field("Age").namespace("user"), |l: &Listing| &l.age);
            d.field(
                FeatureAttr::field("City").namespace("user").enumerize().order(1),
                |l: &Listing| &l.city,
            );
            d.field(FeatureAttr::field("Title").namespace("item"), |l: &Listing| &l.title);
            d.field(FeatureAttr::field("Verified").namespace("item"), |l: &Listing| &l.verified);
            d.field(FeatureAttr::field("Archived").namespace("item"), |l: &Listing| &l.archived);
            d.field(FeatureAttr::field("Tag").namespace("tags").group('t').enumerize(), |l: &Listing| &l.tags);
            d.field(FeatureAttr::field("Count").namespace("counts"), |l: &Listing| &l.counts);
            d.optional(FeatureAttr::field("Coupon").namespace("promo"), |l: &Listing| &l.coupon);
            d.field(FeatureAttr::field("Embedding").namespace("emb"), |l: &Listing| &l.embedding);
        }
    }

    fn listing() -> Listing {
        Listing {
            label: Some(SimpleLabel::new(1.0)),
            age: 30,
            city: "Seattle".to_string(),
            title: "red bike".to_string(),
            verified: true,
            archived: false,
            tags: vec!["new".to_string(), "sale".to_string()],
            counts: vec![3, 0, 1],
            coupon: None,
            embedding: [0.5, 0.0, 0.25],
        }
    }

    #[test]
    fn test_renders_full_line() {
        let line = to_line(&listing()).unwrap();
        assert_eq!(
            line,
            "1 |user Age:30 CitySeattle |item red bike Verified |ttags Tagnew Tagsale \
             |counts Count_0:3 Count_2:1 |promo |emb 0:0.5 2:0.25"
        );
    }

    #[test]
    fn test_skip_empty_namespaces() {
        let config = LineConfig {
            skip_empty_namespaces: true,
            ..LineConfig::default()
        };
        let mut record = listing();
        record.label = None;
        let line = to_line_with(&record, config).unwrap();
        assert!(line.starts_with("|user Age:30"));
        assert!(!line.contains("|promo"));

        record.coupon = Some("SPRING 10".to_string());
        let line = to_line_with(&record, LineConfig::default()).unwrap();
        assert!(line.contains("|promo SPRING 10 |emb"));
    }

    #[test]
    fn test_line_writer() {
        let mut writer = line_writer::<Listing>(LineConfig::default()).unwrap();
        let first = writer.serialize(&listing());
        let second = writer.serialize(&listing());
        assert_eq!(first, second);
        assert!(first.starts_with("1 |user"));
    }
}
