//! CSV export of the current window
//!
//! Pure read of the window state: all channels aligned by slot,
//! oldest-first, with the timestamp label per row. Callable in any
//! session phase; a never-populated window renders as zero rows.

use crate::window::{Channel, SlidingWindow};

/// Header row of the exported CSV
pub const CSV_HEADER: &str = "timestamp,latency_ms,bandwidth_mbps,packet_loss_pct,active_connections";

/// Render the window as CSV text
pub fn window_to_csv(window: &SlidingWindow) -> String {
    let latency = window.channel(Channel::Latency);
    let bandwidth = window.channel(Channel::Bandwidth);
    let packet_loss = window.channel(Channel::PacketLoss);
    let connections = window.channel(Channel::Connections);
    let timestamps = window.timestamps();

    let mut out = String::with_capacity((window.capacity() + 1) * 48);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for i in 0..window.capacity() {
        let label = timestamps[i]
            .map(|ts| ts.format("%H:%M:%S").to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{},{:.2},{:.2},{:.2},{}\n",
            label, latency[i], bandwidth[i], packet_loss[i], connections[i] as u32
        ));
    }

    out
}
