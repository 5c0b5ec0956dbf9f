//! Query-string parse and serialize.

use ranklens_model::{DirectionField, QueryParams, SortColumn, WireSort};
use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;

use super::{CUSTOM_KEY, SORTING_KEY, custom};

/// Decodes a raw query string into the structured parameter model.
///
/// Total: malformed content is dropped at the smallest granularity
/// that keeps the rest intact. When a recognized key appears more than
/// once, the last occurrence wins.
pub fn parse(query: &str) -> QueryParams {
    let mut params = QueryParams::default();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            SORTING_KEY => params.sorting = parse_sorting(&value),
            CUSTOM_KEY => params.custom = custom::decode(&value),
            _ => params
                .passthrough
                .push((key.into_owned(), value.into_owned())),
        }
    }
    params
}

/// Encodes the parameter model back into a query string.
///
/// Field order is normalized: `sorting`, then the custom block, then
/// passthrough parameters in their original order. An empty custom
/// block is omitted entirely.
pub fn serialize(params: &QueryParams) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());
    if let Some(sorting) = &params.sorting {
        match serde_json::to_string(sorting) {
            Ok(encoded) => {
                out.append_pair(SORTING_KEY, &encoded);
            }
            Err(err) => warn!("failed to encode sorting block: {err}"),
        }
    }
    if let Some(block) = params.custom.filter(|block| !block.is_empty()) {
        out.append_pair(CUSTOM_KEY, &custom::encode(&block));
    }
    for (key, value) in &params.passthrough {
        out.append_pair(key, value);
    }
    out.finish()
}

fn parse_sorting(raw: &str) -> Option<Vec<WireSort>> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let entries = value.as_array()?;
    let mut sorting = Vec::with_capacity(entries.len());
    for entry in entries {
        match parse_sort_entry(entry) {
            Some(sort) => sorting.push(sort),
            None => debug!("dropping malformed sort entry: {entry}"),
        }
    }
    Some(sorting)
}

fn parse_sort_entry(entry: &Value) -> Option<WireSort> {
    let order_by =
        SortColumn::parse_api_name(entry.get("orderBy")?.as_str()?).ok()?;
    let order_direction =
        DirectionField::parse_wire(entry.get("orderDirection")?.as_str()?)
            .ok()?;
    Some(WireSort::new(order_by, order_direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranklens_model::{
        CustomParams, Direction, RankRange, SortSpec,
    };

    fn ranked_params() -> QueryParams {
        QueryParams {
            sorting: Some(vec![WireSort::new(
                SortColumn::Acceptance,
                DirectionField::Direction(Direction::Descending),
            )]),
            custom: Some(CustomParams {
                sort: Some(SortSpec::new(
                    SortColumn::Ranking,
                    Direction::Ascending,
                )),
                rank_range: Some(RankRange::new(1200, 2400).unwrap()),
            }),
            passthrough: vec![
                ("page".to_string(), "2".to_string()),
                ("difficulty".to_string(), "HARD".to_string()),
            ],
        }
    }

    #[test]
    fn round_trip_preserves_token_free_params() {
        let params = ranked_params();
        assert_eq!(parse(&serialize(&params)), params);
    }

    #[test]
    fn round_trip_preserves_passthrough_order() {
        let params = QueryParams {
            sorting: None,
            custom: None,
            passthrough: vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "3".to_string()),
            ],
        };
        assert_eq!(parse(&serialize(&params)), params);
    }

    #[test]
    fn parse_is_total_on_garbage() {
        let params =
            parse("sorting=%7Bnot-json&xrank=???&page=4&=empty&lonely");
        assert_eq!(params.sorting, None);
        assert_eq!(params.custom, None);
        assert!(
            params
                .passthrough
                .iter()
                .any(|(key, value)| key == "page" && value == "4")
        );
    }

    #[test]
    fn malformed_sort_entries_are_dropped_entry_wise() {
        let raw = form_urlencoded::Serializer::new(String::new())
            .append_pair(
                SORTING_KEY,
                r#"[{"orderBy":"ACCEPTANCE","orderDirection":"DESCENDING"},
                    {"orderBy":"SHOE_SIZE","orderDirection":"DESCENDING"},
                    {"orderBy":"TITLE"}]"#,
            )
            .finish();
        let params = parse(&raw);
        let sorting = params.sorting.expect("array itself is well-formed");
        assert_eq!(
            sorting,
            vec![WireSort::new(
                SortColumn::Acceptance,
                DirectionField::Direction(Direction::Descending),
            )]
        );
    }

    #[test]
    fn cache_busting_token_survives_the_wire() {
        let params = QueryParams {
            sorting: Some(vec![WireSort::new(
                SortColumn::Frequency,
                DirectionField::Token(1_000_042),
            )]),
            custom: None,
            passthrough: Vec::new(),
        };
        let reparsed = parse(&serialize(&params));
        assert_eq!(reparsed, params);
        assert!(
            reparsed.sorting.unwrap()[0].order_direction.is_token()
        );
    }

    #[test]
    fn custom_block_stays_free_of_percent_escapes() {
        let encoded = serialize(&ranked_params());
        let block = encoded
            .split('&')
            .find_map(|pair| {
                pair.strip_prefix(&format!("{CUSTOM_KEY}="))
            })
            .expect("custom block present");
        assert_eq!(block, "sort.ranking.ascending_range.1200.2400");
        assert!(
            block
                .bytes()
                .all(|b| b.is_ascii_lowercase()
                    || b.is_ascii_digit()
                    || b == b'.'
                    || b == b'_')
        );
    }

    #[test]
    fn empty_custom_block_is_omitted() {
        let params = QueryParams {
            sorting: None,
            custom: Some(CustomParams::default()),
            passthrough: Vec::new(),
        };
        assert_eq!(serialize(&params), "");
        assert_eq!(parse("").custom, None);
    }
}
