//! DynamoDB expression building.
//!
//! Attribute names always go through `#` placeholders, since the front end
//! uses names like `name`, `date` and `status` that are DynamoDB reserved
//! words. Values go through `:` placeholders and are converted with
//! `serde_dynamo`.

use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

use crate::error::Result;
use crate::item::Item;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expression {
    pub text: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl Expression {
    /// Add one `name`/`value` pair under the `index`th placeholders and
    /// return the `(name, value)` tokens.
    fn bind(
        &mut self,
        name_prefix: &str,
        value_prefix: &str,
        index: usize,
        name: &str,
        value: &serde_json::Value,
    ) -> Result<(String, String)> {
        let name_token = format!("#{name_prefix}{index}");
        let value_token = format!(":{value_prefix}{index}");
        self.names.insert(name_token.clone(), name.to_owned());
        self.values
            .insert(value_token.clone(), serde_dynamo::to_attribute_value(value)?);
        Ok((name_token, value_token))
    }
}

/// `SET #attr0 = :val0, #attr1 = :val1, ...`, one clause per update.
pub fn update_expression(updates: &Item) -> Result<Expression> {
    let mut expr = Expression::default();
    let mut clauses = Vec::with_capacity(updates.len());

    for (i, (name, value)) in updates.iter().enumerate() {
        let (n, v) = expr.bind("attr", "val", i, name, value)?;
        clauses.push(format!("{n} = {v}"));
    }

    expr.text = format!("SET {}", clauses.join(", "));
    Ok(expr)
}

/// `#k0 = :v0 AND #k1 = :v1 ...`; used for scan filters and query key
/// conditions alike. Returns `None` for an empty set of conditions.
pub fn equality_expression(conditions: &Item) -> Result<Option<Expression>> {
    if conditions.is_empty() {
        return Ok(None);
    }

    let mut expr = Expression::default();
    let mut clauses = Vec::with_capacity(conditions.len());

    for (i, (name, value)) in conditions.iter().enumerate() {
        let (n, v) = expr.bind("k", "v", i, name, value)?;
        clauses.push(format!("{n} = {v}"));
    }

    expr.text = clauses.join(" AND ");
    Ok(Some(expr))
}
