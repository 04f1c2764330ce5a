//! Conversion of `/info` responses into engine inputs.
//!
//! Every parser is total: malformed entries are skipped and missing numeric
//! fields fall back to their defaults, so nothing here can fail a scan.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::window::{WINDOW_ALL_TIME, WINDOW_PERP_ALL_TIME};
use crate::models::{AccountSnapshot, Fill, FillSide, PortfolioWindows, RawPosition, SeriesPoint, WindowSeries};

use super::fields::{self, number, number_or};

/// Global coin → mid price map. Spot pairs (keys starting with `@`) are skipped.
pub fn parse_mids(resp: &Value) -> HashMap<String, f64> {
    let Some(map) = resp.as_object() else {
        return HashMap::new();
    };

    map.iter()
        .filter(|(coin, _)| !coin.starts_with('@'))
        .map(|(coin, px)| (coin.clone(), fields::as_number(px).unwrap_or(0.0)))
        .collect()
}

/// Account value plus raw positions from a `clearinghouseState` response.
pub fn parse_account_snapshot(state: &Value) -> AccountSnapshot {
    let equity = fields::lookup(state, fields::MARGIN_SUMMARY)
        .map(|ms| number_or(ms, fields::ACCOUNT_VALUE, 0.0))
        .unwrap_or(0.0);

    let raw_positions = fields::lookup(state, fields::ASSET_POSITIONS)
        .and_then(Value::as_array)
        .map(|aps| aps.iter().filter_map(parse_raw_position).collect())
        .unwrap_or_default();

    AccountSnapshot {
        equity,
        raw_positions,
    }
}

fn parse_raw_position(entry: &Value) -> Option<RawPosition> {
    // entries are usually `{ "type": "oneWay", "position": {...} }`
    let pos = fields::lookup(entry, fields::POSITION).unwrap_or(entry);
    if !pos.is_object() {
        return None;
    }

    let leverage = fields::lookup(pos, fields::LEVERAGE).and_then(|lev| match lev {
        Value::Object(_) => number(lev, fields::LEVERAGE_VALUE),
        other => fields::as_number(other),
    });

    Some(RawPosition {
        coin: fields::text(pos, fields::COIN).unwrap_or("Unknown").to_string(),
        size: number_or(pos, fields::SIZE, 0.0),
        entry_px: number_or(pos, fields::ENTRY_PX, 0.0),
        position_value: number_or(pos, fields::POSITION_VALUE, 0.0),
        unrealized_pnl: number_or(pos, fields::UNREALIZED_PNL, 0.0),
        return_on_equity: number(pos, fields::RETURN_ON_EQUITY),
        leverage,
        liquidation_px: number(pos, fields::LIQUIDATION_PX),
        margin_used: number_or(pos, fields::MARGIN_USED, 0.0),
    })
}

/// Fills from a `userFills` response. Entries without a coin, a recognizable
/// side or a timestamp are dropped.
pub fn parse_fills(resp: &Value) -> Vec<Fill> {
    let Some(entries) = resp.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|f| {
            Some(Fill {
                coin: fields::text(f, fields::COIN)?.to_string(),
                side: FillSide::from_api_str(fields::text(f, fields::FILL_SIDE)?)?,
                size: number_or(f, fields::FILL_SIZE, 0.0),
                start_position: number_or(f, fields::START_POSITION, 0.0),
                time: fields::integer(f, fields::TIME)
                    .filter(|&t| DateTime::<Utc>::from_timestamp_millis(t).is_some())?,
            })
        })
        .collect()
}

/// Lookback windows from a `portfolio` response.
///
/// The venue answers with a list of `[window, {accountValueHistory,
/// pnlHistory, vlm}]` pairs; an object keyed by window is accepted as well.
/// `perpAllTime` stands in for a missing `allTime`.
pub fn parse_portfolio_windows(resp: &Value) -> PortfolioWindows {
    let items: Vec<(&str, &Value)> = match resp {
        Value::Array(list) => list
            .iter()
            .filter_map(|item| match item.as_array()?.as_slice() {
                [name, data] => Some((name.as_str()?, data)),
                _ => None,
            })
            .collect(),
        Value::Object(map) => map.iter().map(|(k, v)| (k.as_str(), v)).collect(),
        _ => return PortfolioWindows::new(),
    };

    let mut out: PortfolioWindows = items
        .into_iter()
        .filter(|(_, data)| data.is_object())
        .map(|(name, data)| (name.to_string(), parse_window(data)))
        .collect();

    if !out.contains_key(WINDOW_ALL_TIME) {
        if let Some(perp) = out.get(WINDOW_PERP_ALL_TIME).cloned() {
            out.insert(WINDOW_ALL_TIME.to_string(), perp);
        }
    }

    out
}

fn parse_window(data: &Value) -> WindowSeries {
    WindowSeries {
        account_values: parse_series(fields::lookup(data, fields::ACCOUNT_VALUE_HISTORY)),
        pnls: parse_series(fields::lookup(data, fields::PNL_HISTORY)),
        volume: number_or(data, fields::VOLUME, 0.0),
    }
}

fn parse_series(history: Option<&Value>) -> Vec<SeriesPoint> {
    let Some(points) = history.and_then(Value::as_array) else {
        return Vec::new();
    };

    points
        .iter()
        .filter_map(|p| match p.as_array()?.as_slice() {
            [ts, value] => {
                let time = ts.as_i64().or_else(|| ts.as_str()?.parse().ok())?;
                Some(SeriesPoint::new(time, fields::as_number(value).unwrap_or(0.0)))
            }
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
