use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use opamp_core::error::{OpampError, OpampResult};
use opamp_core::ports::Page;

/// Opaque `continue` cursor: the last key returned plus the collection's
/// generation stamp at the time the first page was issued. A generation
/// mismatch means the collection was mutated mid-iteration; the caller
/// restarts rather than silently skipping or repeating items.
struct Cursor {
    last_key: String,
    generation: u64,
}

impl Cursor {
    fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}\x1f{}", self.last_key, self.generation))
    }

    fn decode(token: &str) -> OpampResult<Self> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|err| OpampError::InvalidArgument(format!("malformed continue token: {err}")))?;
        let text = String::from_utf8(raw).map_err(|err| OpampError::InvalidArgument(format!("malformed continue token: {err}")))?;
        let (last_key, generation) = text
            .split_once('\x1f')
            .ok_or_else(|| OpampError::InvalidArgument("malformed continue token".to_string()))?;
        let generation = generation
            .parse()
            .map_err(|err| OpampError::InvalidArgument(format!("malformed continue token: {err}")))?;
        Ok(Self {
            last_key: last_key.to_string(),
            generation,
        })
    }
}

/// Slices a page out of `items` (already sorted ascending by key).
/// `generation` identifies the collection's current mutation count; a
/// `continue_token` minted against a stale generation is rejected as a
/// `Conflict` so the caller restarts its listing rather than getting a
/// silently inconsistent view.
pub fn paginate<T: Clone>(items: &[(String, T)], limit: usize, continue_token: Option<String>, generation: u64) -> OpampResult<Page<T>> {
    let start = match continue_token {
        None => 0,
        Some(token) => {
            let cursor = Cursor::decode(&token)?;
            if cursor.generation != generation {
                return Err(OpampError::Conflict(
                    "continue token was issued against a collection that has since changed".to_string(),
                ));
            }
            items.partition_point(|(key, _)| key.as_str() <= cursor.last_key.as_str())
        }
    };

    let limit = if limit == 0 { items.len().saturating_sub(start) } else { limit };
    let end = (start + limit).min(items.len());
    let page = &items[start..end];

    let next_continue = if end < items.len() {
        Some(
            Cursor {
                last_key: page.last().map(|(key, _)| key.clone()).unwrap_or_default(),
                generation,
            }
            .encode(),
        )
    } else {
        None
    };

    Ok(Page {
        items: page.iter().map(|(_, value)| value.clone()).collect(),
        next_continue,
        remaining_item_count: Some((items.len() - end) as u64),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn items(n: usize) -> Vec<(String, u32)> {
        (0..n).map(|i| (format!("{i:04}"), i as u32)).collect()
    }

    #[test]
    fn first_page_with_no_token() {
        let items = items(5);
        let page = paginate(&items, 2, None, 1).unwrap();
        assert_eq!(page.items, vec![0, 1]);
        assert!(page.next_continue.is_some());
        assert_eq!(page.remaining_item_count, Some(3));
    }

    #[test]
    fn continuing_visits_each_item_exactly_once() {
        let items = items(7);
        let mut seen = Vec::new();
        let mut token = None;
        loop {
            let page = paginate(&items, 3, token, 1).unwrap();
            seen.extend(page.items);
            token = page.next_continue;
            if token.is_none() {
                break;
            }
        }
        assert_eq!(seen, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn limit_zero_returns_everything_remaining() {
        let items = items(4);
        let page = paginate(&items, 0, None, 1).unwrap();
        assert_eq!(page.items.len(), 4);
        assert!(page.next_continue.is_none());
    }

    #[test]
    fn stale_generation_is_rejected() {
        let items = items(4);
        let page = paginate(&items, 2, None, 1).unwrap();
        let err = paginate(&items, 2, page.next_continue, 2).unwrap_err();
        assert_matches::assert_matches!(err, OpampError::Conflict(_));
    }

    #[test]
    fn malformed_token_is_invalid_argument() {
        let items = items(4);
        let err = paginate(&items, 2, Some("not-a-token".to_string()), 1).unwrap_err();
        assert_matches::assert_matches!(err, OpampError::InvalidArgument(_));
    }
}
