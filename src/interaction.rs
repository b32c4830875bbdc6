//! Interaction log record
//!
//! The record type read by the `featx` binary: one user/item interaction per
//! JSON line, optionally labelled.

use featx_core::{Describe, FeatureAttr, Record, SimpleLabel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(default)]
    pub label: Option<SimpleLabel>,
    pub user: UserContext,
    pub item: ItemContext,
    /// Item embedding, written as a dense namespace
    #[serde(default)]
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(default)]
    pub age: Option<u32>,
    pub city: String,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub premium: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemContext {
    pub id: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Record for UserContext {
    fn describe<D: Describe<Self>>(d: &mut D) {
        d.optional(FeatureAttr::field("age").name("Age"), |u: &UserContext| &u.age);
        d.field(
            FeatureAttr::field("city").name("City").enumerize().order(1),
            |u: &UserContext| &u.city,
        );
        d.optional(
            FeatureAttr::field("segment").name("Segment").enumerize().order(2),
            |u: &UserContext| &u.segment,
        );
        d.field(FeatureAttr::field("premium").name("Premium").order(3), |u: &UserContext| &u.premium);
    }
}

impl Record for ItemContext {
    fn describe<D: Describe<Self>>(d: &mut D) {
        d.field(FeatureAttr::field("id").name("Id").enumerize(), |i: &ItemContext| &i.id);
        d.field(
            FeatureAttr::field("category").name("Category").enumerize(),
            |i: &ItemContext| &i.category,
        );
        d.field(FeatureAttr::field("price").name("Price"), |i: &ItemContext| &i.price);
        d.field(
            FeatureAttr::field("tags").name("Tag").namespace("tags").enumerize(),
            |i: &ItemContext| &i.tags,
        );
    }
}

impl Record for Interaction {
    fn describe<D: Describe<Self>>(d: &mut D) {
        d.label(|i: &Interaction| i.label.as_ref());
        d.nested(FeatureAttr::field("user").namespace("user"), |i: &Interaction| &i.user);
        d.nested(FeatureAttr::field("item").namespace("item").group('i'), |i: &Interaction| &i.item);
        d.field(FeatureAttr::field("embedding").namespace("emb"), |i: &Interaction| &i.embedding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use featx_line::to_line;

    const LINE: &str = r#"{
        "label": {"label": -1.0, "weight": 2.0},
        "user": {"age": 34, "city": "Seattle", "premium": true},
        "item": {"id": "sku 42", "category": "bikes", "price": 129.5, "tags": ["red", "sale"]},
        "embedding": [0.5, 0.0, 0.25]
    }"#;

    #[test]
    fn test_decode_and_render() {
        let interaction: Interaction = serde_json::from_str(LINE).unwrap();
        assert_eq!(interaction.user.segment, None);

        let line = to_line(&interaction).unwrap();
        assert_eq!(
            line,
            "-1 2 |user Age:34 CitySeattle Premium |iitem Idsku_42 Categorybikes Price:129.5 \
             |itags Tagred Tagsale |emb 0:0.5 2:0.25"
        );
    }

    #[test]
    fn test_minimal_interaction() {
        let interaction: Interaction = serde_json::from_str(
            r#"{"user": {"city": "Oslo"}, "item": {"id": "a", "category": "b", "price": 0.0}}"#,
        )
        .unwrap();
        let line = to_line(&interaction).unwrap();
        assert_eq!(line, "|user CityOslo |iitem Ida Categoryb |itags |emb");
    }
}
