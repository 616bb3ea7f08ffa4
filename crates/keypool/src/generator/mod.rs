mod sequence;
mod table;

pub use sequence::*;
pub use table::*;

use crate::{Error, OptimizerKind, Params, QualifiedName, Result, config::keys};
use tracing::warn;

/// Resolves an object-name parameter, qualifying unqualified names with the
/// configured catalog/schema.
fn determine_name(params: &Params, key: &str, default: &str) -> Result<QualifiedName> {
    let raw = params.get_str(key, default);
    if raw.contains('.') {
        QualifiedName::parse(&raw)
    } else {
        QualifiedName::qualified(params.get(keys::CATALOG), params.get(keys::SCHEMA), raw)
    }
}

/// Picks the optimizer strategy and reconciles it with the increment size.
///
/// An explicit `none` together with an increment above one is a configuration
/// conflict; the explicit optimizer choice wins and the increment is forced
/// down to one (logged, not fatal).
fn resolve_optimizer(params: &Params, increment_size: &mut u32) -> Result<OptimizerKind> {
    if *increment_size == 0 {
        return Err(Error::configuration(format!(
            "parameter `{}` must be at least 1",
            keys::INCREMENT_SIZE
        )));
    }
    let prefer_pooled_lo = params.get_bool(keys::PREFER_POOLED_LO, false)?;
    let kind = match params.get(keys::OPTIMIZER) {
        Some(name) => OptimizerKind::from_name(name)?,
        None => OptimizerKind::default_for(*increment_size, prefer_pooled_lo),
    };
    if kind == OptimizerKind::None && *increment_size > 1 {
        warn!(
            increment_size = *increment_size,
            "optimizer `none` cannot pool values; forcing increment_size to 1"
        );
        *increment_size = 1;
    }
    Ok(kind)
}
