use terminal_size::{Width, Height, terminal_size};

// Render a typed table as ASCII with a colored header row.
// Column widths adapt to content, capped to the terminal width.
pub fn print_table(columns: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() { return; }

    let termw = get_terminal_width();
    crate::tprintln!("[cli.outputformatter] detected terminal width={} columns", termw);

    let mut widths: Vec<usize> = columns.iter().map(|s| s.chars().count().min(termw)).collect();
    for r in rows {
        for (i, cell) in r.iter().enumerate().take(columns.len()) {
            let w = visible_len(cell);
            if w > widths[i] { widths[i] = w.min(termw); }
        }
    }

    let sep = build_separator(&widths);
    println!("{}", fit_line_to_width(&sep, termw));
    let header: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    println!("{}", fit_line_to_width(&build_row_header_colored(&header, &widths), termw));
    println!("{}", fit_line_to_width(&sep, termw));
    for r in rows {
        println!("{}", fit_line_to_width(&build_row(r, &widths), termw));
    }
    println!("{}", fit_line_to_width(&sep, termw));
}

fn build_separator(widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('+');
    for w in widths {
        s.push_str(&"-".repeat(*w + 2));
        s.push('+');
    }
    s
}

fn build_row(cells: &[String], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).cloned().unwrap_or_default();
        let (text, align_right) = (truncate(&cell, *w), is_numeric_like(&cell));
        s.push(' ');
        if align_right {
            let pad = w.saturating_sub(visible_len(&text));
            s.push_str(&" ".repeat(pad));
            s.push_str(&text);
        } else {
            s.push_str(&text);
            let pad = w.saturating_sub(visible_len(&text));
            s.push_str(&" ".repeat(pad));
        }
        s.push(' ');
        s.push('|');
    }
    s
}

// Build header row with column names colored green. Keep padding based on visible width.
fn build_row_header_colored(cells: &[String], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).cloned().unwrap_or_default();
        let text = truncate(&cell, *w);
        let colored = format!("\x1b[32m{}\x1b[0m", text); // green
        s.push(' ');
        // headers left-aligned
        s.push_str(&colored);
        let pad = w.saturating_sub(visible_len(&text));
        s.push_str(&" ".repeat(pad));
        s.push(' ');
        s.push('|');
    }
    s
}

fn truncate(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max { return s.to_string(); }
    if max <= 1 { return "…".to_string(); }
    let take = max - 1;
    s.chars().take(take).collect::<String>() + "…"
}

fn is_numeric_like(s: &str) -> bool {
    // crude detection for aligning numbers to right
    let st = s.trim();
    if st.is_empty() { return false; }
    let mut has_digit = false;
    for ch in st.chars() {
        if ch.is_ascii_digit() { has_digit = true; continue; }
        if ".-+eE,_".contains(ch) { continue; }
        return false;
    }
    has_digit
}

// --- Terminal fitting & ANSI helpers ---

fn get_terminal_width() -> usize {
    let size = terminal_size();
    if let Some((Width(w), Height(_h))) = size {
        return (w - 4) as usize;
    }
    80
}

fn fit_line_to_width(s: &str, maxw: usize) -> String {
    if visible_len(s) <= maxw { return s.to_string(); }
    // Hard-truncate at the right edge; append a reset so a cut escape
    // sequence cannot bleed color into the next line.
    let mut out = String::new();
    let mut taken = 0;
    for ch in s.chars() {
        if taken >= maxw.saturating_sub(1) { break; }
        out.push(ch);
        if ch != '\x1b' { taken += 1; }
    }
    out.push('…');
    out.push_str("\x1b[0m");
    out
}

fn visible_len(s: &str) -> usize {
    // Count visible Unicode chars, skipping ANSI escape sequences
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut count = 0;
    while i < bytes.len() {
        if bytes[i] == 0x1B { // ESC
            // Skip CSI: ESC [ ... letter
            i += 1;
            if i < bytes.len() && bytes[i] == b'[' {
                i += 1;
                while i < bytes.len() {
                    let b = bytes[i];
                    i += 1;
                    if (b as char).is_ascii_alphabetic() { break; }
                }
            }
            continue;
        }
        // advance by one UTF-8 char
        let ch = s[i..].chars().next().unwrap();
        count += 1;
        i += ch.len_utf8();
    }
    count
}
