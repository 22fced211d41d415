//! Low-level HTML string helpers, tailored to the launch calendar markup.
//!
//! Deliberately naive: the schedule page is machine-generated and stable,
//! so targeted slicing beats a full DOM parse. Tag and attribute matching
//! is ASCII case-insensitive.

/// Find the next complete tag block from `from` onwards.
///
/// `open_pat` is the start of the opening tag (attributes allowed after
/// it), `close_pat` the full closing tag. Returns byte offsets spanning
/// the whole block, opening tag through closing tag.
pub fn next_block(s: &str, open_pat: &str, close_pat: &str, from: usize) -> Option<(usize, usize)> {
    let lc = lower(s);
    let open_lc = lower(open_pat);
    let close_lc = lower(close_pat);

    let start = lc.get(from..)?.find(&open_lc)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&close_lc)?;
    Some((start, open_end + end_rel + close_pat.len()))
}

/// Content of the first element carrying `class="<name>"` (the wrapping
/// tags are excluded, nested markup is kept).
pub fn class_section<'a>(s: &'a str, class: &str) -> Option<&'a str> {
    section_with_attr(s, &format!("class=\"{}\"", class))
}

/// Content of the first element whose opening tag contains the literal
/// attribute text, e.g. `colspan="2"`.
pub fn section_with_attr<'a>(s: &'a str, attr: &str) -> Option<&'a str> {
    let lc = lower(s);
    let needle = lower(attr);
    let attr_at = lc.find(&needle)?;
    // Back up to the start of the tag, then slice to its matching close.
    let tag_start = s[..attr_at].rfind('<')?;
    let tag_name: String = s[tag_start + 1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    let open_end = s[attr_at..].find('>')? + attr_at + 1;
    let close = format!("</{}>", lower(&tag_name));
    let end_rel = lc[open_end..].find(&close)?;
    Some(&s[open_end..open_end + end_rel])
}

/// First `http…` URL embedded in a `style` attribute, e.g.
/// `style="background-image:url('http…jpg');"`.
pub fn style_url(s: &str) -> Option<String> {
    let at = s.find("style=\"")?;
    let style_end = s[at + 7..].find('"')? + at + 7;
    let style = &s[at + 7..style_end];
    let url_at = style.find("http")?;
    let tail = &style[url_at..];
    let end = tail
        .find(|c| matches!(c, '\'' | ')' | '"' | ';'))
        .unwrap_or(tail.len());
    Some(tail[..end].to_string())
}

/// Visible text of a markup fragment: tags removed, the common entities
/// decoded, whitespace collapsed.
pub fn text_of(s: &str) -> String {
    let mut flat = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => flat.push(ch),
            _ => {}
        }
    }
    collapse_ws(&flat.replace("&nbsp;", " ").replace("&amp;", "&"))
}

fn collapse_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

fn lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}
