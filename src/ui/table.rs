use sshed_core::{
    HostCollection, HostRecord,
    editor::{HOST_NAME, IDENTITY_FILE, PORT, USER},
};

use super::theme::Theme;

const HEADERS: [&str; 5] = ["NAME", "HOSTNAME", "USER", "PORT", "IDENTITY FILE"];
const EMPTY_CELL: &str = "-";
const GAP: &str = "  ";

/// Render the host list as aligned columns, one row per host.
pub fn render_host_table(hosts: &HostCollection, theme: &Theme) -> String {
    if hosts.is_empty() {
        return format!("{}\n", theme.dimmed().paint("No hosts configured"));
    }

    let rows: Vec<[&str; 5]> = hosts.iter().map(row).collect();

    let mut widths = HEADERS.map(width);
    for cells in &rows {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(width(cell));
        }
    }

    let mut out = render_row(&HEADERS, &widths, |_, s| theme.label().paint(s).to_string());
    for cells in &rows {
        out.push_str(&render_row(cells, &widths, |col, s| match col {
            0 => theme.title().paint(s).to_string(),
            _ if s.trim_end() == EMPTY_CELL => theme.dimmed().paint(s).to_string(),
            _ => theme.value().paint(s).to_string(),
        }));
    }
    out
}

/// `Host <name>` followed by every option, keys aligned.
pub fn render_host_detail(host: &HostRecord, theme: &Theme) -> String {
    let mut out = format!("{}\n", theme.title().paint(format!("Host {}", host.name)));

    if host.options.is_empty() {
        out.push_str(&format!("  {}\n", theme.dimmed().paint("(no options)")));
        return out;
    }

    let key_width = host.options.keys().map(width).max().unwrap_or(0);
    for (key, value) in host.options.iter() {
        let padded = format!("{key:key_width$}");
        out.push_str(&format!(
            "  {}  {}\n",
            theme.label().paint(padded),
            theme.value().paint(value)
        ));
    }
    out
}

fn row(host: &HostRecord) -> [&str; 5] {
    let cell = |key| host.get(key).unwrap_or(EMPTY_CELL);
    [
        host.name.as_str(),
        cell(HOST_NAME),
        cell(USER),
        cell(PORT),
        cell(IDENTITY_FILE),
    ]
}

/// Pads before painting so escape codes don't count toward the width.
fn render_row(
    cells: &[&str; 5],
    widths: &[usize; 5],
    paint: impl Fn(usize, &str) -> String,
) -> String {
    let last = cells.len() - 1;
    let mut line = String::new();
    for (col, (cell, &w)) in cells.iter().zip(widths).enumerate() {
        if col > 0 {
            line.push_str(GAP);
        }
        let padded = if col == last {
            (*cell).to_string()
        } else {
            format!("{cell:w$}")
        };
        line.push_str(&paint(col, &padded));
    }
    line.push('\n');
    line
}

fn width(s: &str) -> usize {
    s.chars().count()
}
