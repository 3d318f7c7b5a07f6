//! Decoding of `text/event-stream` bodies produced by OpenAI-compatible
//! chat completion endpoints when `stream` is enabled.

use std::collections::VecDeque;
use std::fmt::Display;

use futures_util::stream::{self, BoxStream, StreamExt};
use serde::Deserialize;
use sn_core::{Error, FragmentStream, Result};

const DONE_MARKER: &str = "[DONE]";

#[derive(Deserialize)]
struct ChunkResponse {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Incremental line decoder. Bytes may arrive split anywhere, including in
/// the middle of a UTF-8 sequence.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed a chunk of the body, returning every fragment it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<String>> {
        self.buffer.extend_from_slice(chunk);
        let mut out = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(item) = self.decode_line(&line) {
                out.push(item);
            }
        }
        out
    }

    /// Flush a trailing line that was not newline-terminated.
    pub fn finish(&mut self) -> Vec<Result<String>> {
        let rest = std::mem::take(&mut self.buffer);
        self.decode_line(&rest).into_iter().collect()
    }

    fn decode_line(&mut self, raw: &[u8]) -> Option<Result<String>> {
        if self.done {
            return None;
        }
        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let payload = line.strip_prefix("data:")?.trim();

        if payload.is_empty() {
            return None;
        }
        if payload == DONE_MARKER {
            self.done = true;
            return None;
        }

        match serde_json::from_str::<ChunkResponse>(payload) {
            Ok(ChunkResponse { error: Some(error), .. }) => {
                Some(Err(Error::GenerationFailed(error.message)))
            }
            Ok(chunk) => chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content)
                .map(Ok),
            Err(e) => Some(Err(Error::GenerationFailed(format!(
                "Malformed stream chunk: {}",
                e
            )))),
        }
    }
}

struct DecodeState<B, E> {
    bytes: BoxStream<'static, std::result::Result<B, E>>,
    decoder: SseDecoder,
    pending: VecDeque<Result<String>>,
    exhausted: bool,
}

/// Turn a raw body stream into a stream of content fragments.
pub fn decode_stream<S, B, E>(bytes: S) -> FragmentStream
where
    S: futures_util::Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = DecodeState {
        bytes: bytes.boxed(),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        exhausted: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.exhausted || state.decoder.is_done() {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let items = state.decoder.push(chunk.as_ref());
                    state.pending.extend(items);
                }
                Some(Err(e)) => {
                    state.exhausted = true;
                    state
                        .pending
                        .push_back(Err(Error::GenerationFailed(format!("Stream interrupted: {}", e))));
                }
                None => {
                    state.exhausted = true;
                    let items = state.decoder.finish();
                    state.pending.extend(items);
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str) -> String {
        format!(
            "data: {{\"choices\":[{{\"index\":0,\"delta\":{{\"content\":{}}}}}]}}\n\n",
            serde_json::to_string(content).unwrap()
        )
    }

    #[test]
    fn test_decoder_handles_split_lines() {
        let body = format!("{}{}data: [DONE]\n\n", chunk("Hello"), chunk(" world"));
        let bytes = body.as_bytes();

        let mut decoder = SseDecoder::new();
        let mut fragments = Vec::new();
        for piece in bytes.chunks(7) {
            for item in decoder.push(piece) {
                fragments.push(item.unwrap());
            }
        }

        assert_eq!(fragments, vec!["Hello".to_string(), " world".to_string()]);
        assert!(decoder.is_done());
    }

    #[test]
    fn test_decoder_skips_role_only_deltas_and_comments() {
        let body = concat!(
            ": keep-alive\n",
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n",
            "event: message\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"},\"finish_reason\":null}]}\r\n",
            "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n",
        );
        let mut decoder = SseDecoder::new();
        let fragments: Vec<String> = decoder
            .push(body.as_bytes())
            .into_iter()
            .map(|item| item.unwrap())
            .collect();
        assert_eq!(fragments, vec!["Hi".to_string()]);
        assert!(!decoder.is_done());
    }

    #[test]
    fn test_decoder_reports_api_errors() {
        let mut decoder = SseDecoder::new();
        let items = decoder.push(b"data: {\"error\":{\"message\":\"quota exceeded\"}}\n");
        assert_eq!(items.len(), 1);
        let err = items.into_iter().next().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate article: quota exceeded");

        let items = decoder.push(b"data: {not json\n");
        assert!(matches!(items[0], Err(Error::GenerationFailed(_))));
    }

    #[test]
    fn test_decoder_keeps_multibyte_characters_intact() {
        let body = chunk("caf\u{e9} \u{20ac}5");
        let bytes = body.as_bytes();
        let split = bytes.iter().position(|b| *b == 0xC3).unwrap() + 1;

        let mut decoder = SseDecoder::new();
        assert!(decoder.push(&bytes[..split]).is_empty());
        let items = decoder.push(&bytes[split..]);
        assert_eq!(items.into_iter().next().unwrap().unwrap(), "caf\u{e9} \u{20ac}5");
    }

    #[tokio::test]
    async fn test_decode_stream_stops_at_done_and_flushes_tail() {
        let parts: Vec<std::result::Result<Vec<u8>, String>> = vec![
            Ok(chunk("A").into_bytes()),
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"B\"}}]}".to_vec()),
        ];
        let fragments: Vec<String> = decode_stream(stream::iter(parts))
            .map(|item| item.unwrap())
            .collect()
            .await;
        assert_eq!(fragments, vec!["A".to_string(), "B".to_string()]);

        let parts: Vec<std::result::Result<Vec<u8>, String>> = vec![
            Ok(format!("{}data: [DONE]\n{}", chunk("A"), chunk("ignored")).into_bytes()),
        ];
        let fragments: Vec<String> = decode_stream(stream::iter(parts))
            .map(|item| item.unwrap())
            .collect()
            .await;
        assert_eq!(fragments, vec!["A".to_string()]);
    }

    #[tokio::test]
    async fn test_decode_stream_surfaces_transport_errors() {
        let parts: Vec<std::result::Result<Vec<u8>, String>> = vec![
            Ok(chunk("A").into_bytes()),
            Err("connection reset".to_string()),
        ];
        let items: Vec<Result<String>> = decode_stream(stream::iter(parts)).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "A");
        assert_eq!(
            items[1].as_ref().unwrap_err().to_string(),
            "Failed to generate article: Stream interrupted: connection reset"
        );
    }
}
