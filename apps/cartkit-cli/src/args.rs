//! Entity arguments shared by the item commands.
//!
//! `--type Product --key 22 --attr name=Chair --attr price=500` becomes a
//! [`ManagedRecord`] with primary key `id`.

use clap::Args;

use cartkit_core::{AttributeValue, EntityKey, ManagedRecord};

#[derive(Args, Debug, Clone)]
pub struct EntityArgs {
    /// Entity type name (e.g. Product)
    #[arg(long = "type", value_name = "TYPE")]
    pub entity_type: String,

    /// Primary key; integers are stored as numbers
    #[arg(long, value_name = "KEY")]
    pub key: String,

    /// Entity attribute, repeatable
    #[arg(long = "attr", value_name = "NAME=VALUE", value_parser = parse_pair)]
    pub attrs: Vec<(String, AttributeValue)>,
}

impl EntityArgs {
    /// Builds the record. `--key` wins over an `id` passed through `--attr`.
    pub fn to_record(&self) -> ManagedRecord {
        let mut record = ManagedRecord::new(&self.entity_type);
        for (name, value) in &self.attrs {
            record.insert(name.clone(), value.clone());
        }
        record.insert(record.primary_key().to_string(), parse_key(&self.key));
        record
    }
}

/// Parses `name=value`.
pub fn parse_pair(raw: &str) -> Result<(String, AttributeValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing attribute name in '{raw}'"));
    }
    Ok((name.to_string(), parse_value(value)))
}

/// Best-effort typing: bool, null, integer, finite float, else text.
pub fn parse_value(raw: &str) -> AttributeValue {
    match raw {
        "true" => return AttributeValue::Bool(true),
        "false" => return AttributeValue::Bool(false),
        "null" => return AttributeValue::Null,
        _ => {}
    }
    if let Ok(int) = raw.parse::<i64>() {
        return AttributeValue::Int(int);
    }
    match raw.parse::<f64>() {
        Ok(float) if float.is_finite() => AttributeValue::Float(float),
        _ => AttributeValue::Text(raw.to_string()),
    }
}

fn parse_key(raw: &str) -> EntityKey {
    raw.parse::<i64>()
        .map(EntityKey::Int)
        .unwrap_or_else(|_| EntityKey::Text(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartkit_core::{Buyable, Identity};

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("true"), AttributeValue::Bool(true));
        assert_eq!(parse_value("null"), AttributeValue::Null);
        assert_eq!(parse_value("500"), AttributeValue::Int(500));
        assert_eq!(parse_value("19.99"), AttributeValue::Float(19.99));
        assert_eq!(parse_value("NaN"), AttributeValue::Text("NaN".to_string()));
        assert_eq!(parse_value("Chair"), AttributeValue::Text("Chair".to_string()));
        assert_eq!(parse_value(""), AttributeValue::Text(String::new()));
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("note=a=b").unwrap(),
            ("note".to_string(), AttributeValue::Text("a=b".to_string()))
        );
        assert!(parse_pair("novalue").is_err());
        assert!(parse_pair("=5").is_err());
    }

    #[test]
    fn test_to_record_identity() {
        let args = EntityArgs {
            entity_type: "Product".to_string(),
            key: "22".to_string(),
            attrs: vec![
                ("id".to_string(), AttributeValue::Int(1)),
                ("price".to_string(), AttributeValue::Int(500)),
            ],
        };
        let record = args.to_record();
        assert_eq!(
            cartkit_core::buyable::identity_of(&record).unwrap(),
            Identity::new("Product", 22)
        );
        assert_eq!(record.get("price"), Some(&AttributeValue::Int(500)));

        let args = EntityArgs {
            key: "GIFT-10".to_string(),
            attrs: vec![],
            ..args
        };
        assert_eq!(args.to_record().identity(), Some(EntityKey::from("GIFT-10")));
    }
}
