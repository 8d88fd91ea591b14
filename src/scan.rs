//! Best-effort mining of the derivative-quote document. The upstream
//! schema moves around, so instead of a typed model this walks the raw
//! JSON looking for the first node that carries both an open-interest
//! and a volume field. A heuristic, not a validated extraction.

use serde_json::{Map, Value};

/// Depth-first search for the first object node satisfying
/// [`oi_volume_at`]. Objects are visited before recursing, object
/// values in key order, array elements in index order.
pub fn find_oi_volume(value: &Value) -> Option<(f64, f64)> {
    match value {
        Value::Object(map) => {
            if let Some(pair) = oi_volume_at(map) {
                return Some(pair);
            }
            map.values().find_map(find_oi_volume)
        }
        Value::Array(items) => items.iter().find_map(find_oi_volume),
        _ => None,
    }
}

/// True match only when a single node holds both fields: some key
/// containing "open" and "interest" (case-insensitive) with a numeric
/// value, and some key containing "volume" with a numeric value.
fn oi_volume_at(map: &Map<String, Value>) -> Option<(f64, f64)> {
    let mut oi = None;
    let mut volume = None;

    for (key, value) in map {
        let Some(number) = value.as_f64() else {
            continue;
        };
        let key = key.to_lowercase();

        if oi.is_none() && key.contains("open") && key.contains("interest") {
            oi = Some(number);
        } else if volume.is_none() && key.contains("volume") {
            volume = Some(number);
        }
    }

    Some((oi?, volume?))
}
