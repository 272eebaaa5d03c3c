//! Multi-identifier fan-out

use super::types::FanOut;
use crate::error::Result;
use crate::request::Ids;
use std::future::Future;
use tracing::debug;

/// Run `call` once per identifier, strictly in order
///
/// With no identifier `call` receives `None`; with one identifier the bare
/// result is returned. The first failure aborts the fan-out, discarding
/// earlier results, and is wrapped with the offending identifier.
pub async fn fan_out<'a, T, F, Fut>(ids: &'a Ids, mut call: F) -> Result<FanOut<T>>
where
    F: FnMut(Option<&'a str>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match ids {
        Ids::None => Ok(FanOut::One(call(None).await?)),
        Ids::Single(id) => {
            let result = call(Some(id)).await.map_err(|e| e.for_id(id.as_str()))?;
            Ok(FanOut::One(result))
        }
        Ids::Many(list) => {
            let mut results = Vec::with_capacity(list.len());
            for (index, id) in list.iter().enumerate() {
                debug!("Fan-out {}/{}: {}", index + 1, list.len(), id);
                let result = call(Some(id)).await.map_err(|e| e.for_id(id.as_str()))?;
                results.push(result);
            }
            Ok(FanOut::Many(results))
        }
    }
}
