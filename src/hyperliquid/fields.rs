use serde_json::Value;

// ---------------------------------------------------------------------------
// Candidate keys per logical attribute, most specific first
// ---------------------------------------------------------------------------

pub const COIN: &[&str] = &["coin", "symbol", "name"];
pub const SIZE: &[&str] = &["szi", "size"];
pub const ENTRY_PX: &[&str] = &["entryPx", "entryPrice"];
pub const POSITION_VALUE: &[&str] = &["positionValue", "notional"];
pub const UNREALIZED_PNL: &[&str] = &["unrealizedPnl", "upnl"];
pub const RETURN_ON_EQUITY: &[&str] = &["returnOnEquity", "roe"];
pub const LEVERAGE: &[&str] = &["leverage", "lev"];
pub const LEVERAGE_VALUE: &[&str] = &["value"];
pub const LIQUIDATION_PX: &[&str] = &["liquidationPx", "liqPx", "liquidationPrice"];
pub const MARGIN_USED: &[&str] = &["marginUsed", "margin"];

pub const MARGIN_SUMMARY: &[&str] = &["marginSummary", "crossMarginSummary"];
pub const ACCOUNT_VALUE: &[&str] = &["accountValue", "equity"];
pub const ASSET_POSITIONS: &[&str] = &["assetPositions", "positions"];
pub const POSITION: &[&str] = &["position"];

pub const FILL_SIDE: &[&str] = &["side"];
pub const FILL_SIZE: &[&str] = &["sz", "size"];
pub const START_POSITION: &[&str] = &["startPosition", "startPos"];
pub const TIME: &[&str] = &["time", "timestamp"];

pub const ACCOUNT_VALUE_HISTORY: &[&str] = &["accountValueHistory"];
pub const PNL_HISTORY: &[&str] = &["pnlHistory"];
pub const VOLUME: &[&str] = &["vlm", "volume"];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// First non-null value under any of `keys`.
pub fn lookup<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = obj.as_object()?;
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

/// Numeric attribute. Accepts JSON numbers and numeric strings; empty or
/// unparseable strings and non-finite values are treated as absent.
pub fn number(obj: &Value, keys: &[&str]) -> Option<f64> {
    lookup(obj, keys).and_then(as_number)
}

pub fn number_or(obj: &Value, keys: &[&str], default: f64) -> f64 {
    number(obj, keys).unwrap_or(default)
}

pub fn text<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a str> {
    lookup(obj, keys).and_then(Value::as_str)
}

/// Largest magnitude an `f64` can carry into an `i64` exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Integer attribute (e.g. epoch-ms timestamps), accepting numbers or strings.
/// Fractional or out-of-range floats are treated as absent.
pub fn integer(obj: &Value, keys: &[&str]) -> Option<i64> {
    match lookup(obj, keys)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn as_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if !s.trim().is_empty() => s.trim().parse().ok()?,
        _ => return None,
    };
    Some(n).filter(|n| n.is_finite())
}
