//! # Commands
//!
//! One subcommand per cart operation. Every command returns the JSON value
//! printed on stdout.

use anyhow::Result;
use clap::Subcommand;
use serde_json::{json, Value};

use cartkit_core::{AttributeValue, Attributes};
use cartkit_session::{CartEngine, SessionStore};

use crate::args::{parse_pair, EntityArgs};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print items and totals
    Show,

    /// Add an entity to the cart
    Add {
        #[command(flatten)]
        entity: EntityArgs,

        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,

        /// Line option stored on the item, repeatable
        #[arg(long = "opt", value_name = "NAME=VALUE", value_parser = parse_pair)]
        opts: Vec<(String, AttributeValue)>,
    },

    /// Refresh an item from the entity, optionally changing its quantity
    Update {
        #[command(flatten)]
        entity: EntityArgs,

        #[arg(short, long, allow_negative_numbers = true)]
        quantity: Option<i64>,

        #[arg(long = "opt", value_name = "NAME=VALUE", value_parser = parse_pair)]
        opts: Vec<(String, AttributeValue)>,
    },

    /// Remove an item
    Remove {
        #[command(flatten)]
        entity: EntityArgs,
    },

    /// Increase an item's quantity
    AddQty {
        #[command(flatten)]
        entity: EntityArgs,

        #[arg(short, long, allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Decrease an item's quantity, removing it at zero
    RemoveQty {
        #[command(flatten)]
        entity: EntityArgs,

        #[arg(short, long, allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Check whether an entity is in the cart
    Exists {
        #[command(flatten)]
        entity: EntityArgs,
    },

    /// Print the discount, or set it when PERCENT is given
    Discount {
        #[arg(allow_negative_numbers = true)]
        percent: Option<i64>,
    },

    /// Delete the session and empty the cart
    Destroy,
}

/// Runs `command` against `cart`.
pub fn run<S: SessionStore>(cart: &mut CartEngine<S>, command: Command) -> Result<Value> {
    let output = match command {
        Command::Show => serde_json::to_value(cart.summary())?,

        Command::Add {
            entity,
            quantity,
            opts,
        } => {
            let item = cart.add_with_options(&entity.to_record(), quantity, &options(opts))?;
            serde_json::to_value(item)?
        }

        Command::Update {
            entity,
            quantity,
            opts,
        } => {
            let item = cart.update_with_options(&entity.to_record(), quantity, &options(opts))?;
            serde_json::to_value(item)?
        }

        Command::Remove { entity } => json!({ "removed": cart.remove(&entity.to_record())? }),

        Command::AddQty { entity, quantity } => {
            serde_json::to_value(cart.add_quantity(&entity.to_record(), quantity)?)?
        }

        Command::RemoveQty { entity, quantity } => {
            serde_json::to_value(cart.remove_quantity(&entity.to_record(), quantity)?)?
        }

        Command::Exists { entity } => json!({ "exists": cart.item_exists(&entity.to_record()) }),

        Command::Discount { percent } => {
            if let Some(percent) = percent {
                cart.set_discount(percent)?;
            }
            json!({
                "discount": cart.get_discount(),
                "discountPrice": cart.discount_price(),
                "total": cart.total(),
            })
        }

        Command::Destroy => {
            cart.destroy()?;
            json!({ "destroyed": true })
        }
    };
    Ok(output)
}

fn options(pairs: Vec<(String, AttributeValue)>) -> Attributes {
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartkit_core::CartConfig;
    use cartkit_session::MemorySessionStore;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["cartkit"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().command
    }

    fn exec(cart: &mut CartEngine<&mut MemorySessionStore>, args: &[&str]) -> Result<Value> {
        run(cart, parse(args))
    }

    const CHAIR: [&str; 6] = ["--type", "Product", "--key", "22", "--attr", "price=500"];
    const LAMP: [&str; 6] = ["--type", "Product", "--key", "23", "--attr", "price=200"];

    fn with(
        command: &'static str,
        entity: &[&'static str],
        rest: &[&'static str],
    ) -> Vec<&'static str> {
        let mut args = vec![command];
        args.extend_from_slice(entity);
        args.extend_from_slice(rest);
        args
    }

    #[test]
    fn test_session_flow() {
        let mut store = MemorySessionStore::new();
        let mut cart = CartEngine::new(CartConfig::default(), &mut store).unwrap();

        let item = exec(&mut cart, &with("add", &CHAIR, &["-q", "2", "--opt", "color=red"])).unwrap();
        assert_eq!(item["quantity"], 2);
        assert_eq!(item["attributes"]["color"], "red");

        exec(&mut cart, &with("add", &LAMP, &[])).unwrap();
        let item = exec(&mut cart, &with("add-qty", &CHAIR, &["-q", "1"])).unwrap();
        assert_eq!(item["quantity"], 3);

        let exists = exec(&mut cart, &with("exists", &LAMP, &[])).unwrap();
        assert_eq!(exists["exists"], true);

        let discount = exec(&mut cart, &["discount", "10"]).unwrap();
        assert_eq!(discount["discount"], 10);

        let summary = exec(&mut cart, &["show"]).unwrap();
        assert_eq!(summary["count"], 2);
        assert_eq!(summary["subTotal"], 1700.0);
        assert_eq!(summary["total"], 1530.0);

        let removed = exec(&mut cart, &with("remove-qty", &LAMP, &["-q", "1"])).unwrap();
        assert_eq!(removed["quantity"], 0);

        exec(&mut cart, &["destroy"]).unwrap();
        drop(cart);
        assert!(store.is_empty());
    }

    #[test]
    fn test_errors_surface() {
        let mut store = MemorySessionStore::new();
        let mut cart = CartEngine::new(CartConfig::default(), &mut store).unwrap();

        assert!(exec(&mut cart, &with("add", &CHAIR, &["-q", "-1"])).is_err());
        assert!(exec(&mut cart, &with("remove", &CHAIR, &[])).is_err());
        assert!(exec(&mut cart, &["discount", "150"]).is_err());

        let err = exec(&mut cart, &with("add", &CHAIR, &["--opt", "price=1"])).unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_parse_rejects_malformed_attr() {
        let result = TestCli::try_parse_from(["cartkit", "add", "--type", "P", "--key", "1", "--attr", "oops"]);
        assert!(result.is_err());
    }
}
