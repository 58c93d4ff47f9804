//! Replay of recorded call history

use serde::Serialize;
use std::fmt;
use tracing::warn;

use crate::cache::keys::MethodKey;
use crate::cache::Cache;
use crate::kv::KeyValueStore;
use crate::types::Result;

/// One call reconstructed from history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedCall {
    /// Argument tuple literal, e.g. `('Hello, Redis!',)`
    pub args: String,
    /// Rendered result
    pub output: String,
}

/// A method's call log as read back from the store
///
/// `inputs` is the header count. `calls` pairs inputs with outputs
/// positionally and stops at the shorter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replay {
    pub method: String,
    pub inputs: usize,
    pub outputs: usize,
    pub calls: Vec<RecordedCall>,
}

impl Replay {
    /// Read the full input and output lists for `method`
    pub async fn load(store: &dyn KeyValueStore, method: &MethodKey) -> Result<Self> {
        let inputs = store.lrange(&method.inputs_key(), 0, -1).await?;
        let outputs = store.lrange(&method.outputs_key(), 0, -1).await?;

        if inputs.len() != outputs.len() {
            warn!(
                method = %method,
                inputs = inputs.len(),
                outputs = outputs.len(),
                "call history lengths differ; replay truncated to shorter list"
            );
        }

        let calls = inputs
            .iter()
            .zip(outputs.iter())
            .map(|(args, output)| RecordedCall {
                args: String::from_utf8_lossy(args).into_owned(),
                output: String::from_utf8_lossy(output).into_owned(),
            })
            .collect();

        Ok(Self {
            method: method.to_string(),
            inputs: inputs.len(),
            outputs: outputs.len(),
            calls,
        })
    }

    /// True when every recorded input has a matching output
    pub fn is_consistent(&self) -> bool {
        self.inputs == self.outputs
    }

    /// Inputs with no recorded output
    pub fn unmatched(&self) -> usize {
        self.inputs.saturating_sub(self.outputs)
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.method, self.inputs)?;
        for call in &self.calls {
            writeln!(f, "{}(*{}) -> {}", self.method, call.args, call.output)?;
        }
        Ok(())
    }
}

/// Print the recorded call log of `method` on `cache` to stdout
pub async fn replay(cache: &Cache, method: impl Into<MethodKey>) -> Result<Replay> {
    let replay = cache.history(&method.into()).await?;
    print!("{}", replay);
    Ok(replay)
}
