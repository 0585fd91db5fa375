//! Property-based tests for frame assembly and parsing

use super::*;
use proptest::prelude::*;

fn arb_event() -> impl Strategy<Value = StreamEvent> {
    prop_oneof![
        Just(StreamEvent::ContentStart),
        Just(StreamEvent::ContentEnd),
        ("\\PC{1,2}", proptest::option::of("[0-9]{1,4}"))
            .prop_map(|(ch, id)| StreamEvent::content_char(ch, id)),
        ("[a-z_]{3,12}", "\\PC{0,40}").prop_map(|(kind, text)| {
            let step = ReasoningStep::new(StepKind::from_wire(&kind)).with_content(text);
            StreamEvent::reasoning(step)
        }),
    ]
}

/// A well-formed stream: every event frame followed by a blank separator,
/// with the occasional comment line mixed in.
fn arb_stream() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec((arb_event(), any::<bool>()), 0..30).prop_map(|events| {
        let mut out = String::new();
        for (event, comment) in events {
            if comment {
                out.push_str(": ping\n");
            }
            out.push_str(&event.to_frame().unwrap());
            out.push_str("\n\n");
        }
        out.into_bytes()
    })
}

fn assemble(chunks: &[&[u8]]) -> Vec<String> {
    let mut assembler = FrameAssembler::new();
    let mut frames = Vec::new();
    for chunk in chunks {
        frames.extend(assembler.push(chunk));
    }
    assert_eq!(assembler.finish(), 0);
    frames
}

fn split_at(bytes: &[u8], mut cuts: Vec<usize>) -> Vec<&[u8]> {
    cuts.iter_mut().for_each(|c| *c = (*c).min(bytes.len()));
    cuts.sort_unstable();
    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunks.push(&bytes[start..cut]);
        start = cut;
    }
    chunks.push(&bytes[start..]);
    chunks
}

proptest! {
    #[test]
    fn prop_chunk_split_invariance(
        stream in arb_stream(),
        cuts in proptest::collection::vec(0usize..4096, 0..20),
    ) {
        let whole = assemble(&[stream.as_slice()]);
        let chunks = split_at(&stream, cuts);
        let split = assemble(&chunks);
        prop_assert_eq!(whole, split);
    }

    #[test]
    fn prop_byte_at_a_time_matches_whole(stream in arb_stream()) {
        let whole = assemble(&[stream.as_slice()]);
        let singles: Vec<&[u8]> = stream.chunks(1).collect();
        prop_assert_eq!(whole, assemble(&singles));
    }

    #[test]
    fn prop_encoded_frames_decode_back(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut bytes = Vec::new();
        for event in &events {
            bytes.extend_from_slice(event.to_frame().unwrap().as_bytes());
            bytes.extend_from_slice(b"\n\n");
        }
        let decoded: Vec<StreamEvent> = assemble(&[bytes.as_slice()])
            .iter()
            .filter_map(|frame| match parse_frame(frame) {
                ParsedFrame::Event(event) => Some(event),
                _ => None,
            })
            .collect();
        prop_assert_eq!(decoded, events);
    }

    #[test]
    fn prop_garbage_never_panics(frame in "\\PC{0,80}") {
        let _ = parse_frame(&frame);
        let with_marker = format!("{DATA_MARKER}{frame}");
        let _ = parse_frame(&with_marker);
    }
}
