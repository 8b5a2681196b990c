//! Outbound SSE frames written to the browser.

use bytes::Bytes;

/// Terminal frame sent once the upstream reports completion.
pub const DONE_FRAME: &str = "event: done\ndata: \n\n";

/// Replace newlines with display markup: `\n\n` becomes `<br><br>`,
/// any remaining `\n` becomes `<br>`.
///
/// Not idempotent in general; apply once per fragment.
pub fn to_markup(text: &str) -> String {
    text.replace("\n\n", "<br><br>").replace('\n', "<br>")
}

/// A single frame of the simplified client protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// `data: <text>` with markup already applied.
    Data(String),
    Done,
}

impl OutboundFrame {
    /// Frame a raw upstream text fragment.
    pub fn text(fragment: &str) -> Self {
        OutboundFrame::Data(to_markup(fragment))
    }

    pub fn encode(&self) -> Bytes {
        match self {
            OutboundFrame::Data(text) => Bytes::from(format!("data: {}\n\n", text)),
            OutboundFrame::Done => Bytes::from_static(DONE_FRAME.as_bytes()),
        }
    }
}
