// ── Tree filters ──
//
// A filter narrows or reshapes the live tree before it is compared. The
// engine only consumes the result; the bundled implementation evaluates a
// JMESPath expression.

use std::fmt;

use crate::error::CoreError;
use crate::value::Value;

/// Turn a tree into the substructure a caller wants to manage.
pub trait TreeFilter {
    fn apply(&self, tree: &Value) -> Result<Value, CoreError>;
}

impl<F> TreeFilter for F
where
    F: Fn(&Value) -> Value,
{
    fn apply(&self, tree: &Value) -> Result<Value, CoreError> {
        Ok(self(tree))
    }
}

/// A compiled JMESPath expression.
///
/// `"a"."b" | {"a": {"b": @}}` applied to `{"a": {"b": 1, "c": 2}}` gives
/// `{"a": {"b": 1}}`. An expression that selects nothing gives null.
pub struct JmesPathQuery {
    expr: jmespath::Expression<'static>,
}

impl JmesPathQuery {
    pub fn compile(query: &str) -> Result<Self, CoreError> {
        let expr = jmespath::compile(query).map_err(|e| CoreError::InvalidQuery {
            query: query.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { expr })
    }

    pub fn as_str(&self) -> &str {
        self.expr.as_str()
    }
}

impl fmt::Debug for JmesPathQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("JmesPathQuery").field(&self.as_str()).finish()
    }
}

impl fmt::Display for JmesPathQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TreeFilter for JmesPathQuery {
    fn apply(&self, tree: &Value) -> Result<Value, CoreError> {
        let failed = |reason: String| CoreError::InvalidQuery {
            query: self.as_str().to_owned(),
            reason,
        };

        // Integer keys become strings on the way through serde_json.
        let input = serde_json::Value::from(tree);
        let found = self.expr.search(input).map_err(|e| failed(e.to_string()))?;
        let output = serde_json::to_value(&*found).map_err(|e| failed(e.to_string()))?;
        Ok(Value::from(output))
    }
}
