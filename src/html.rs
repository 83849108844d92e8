// Plain string scanning over Sports Reference pages. Tag and attribute
// matching is ASCII case-insensitive; text is returned with tags stripped,
// common entities decoded and whitespace collapsed.

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Content between the end of the opening tag matching `open_pat` and the
/// next `close_pat`.
pub fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = to_lower(s);
    let o = lc.find(&to_lower(open_pat))?;
    let after = s[o..].find('>')? + o + 1;
    let cr = lc[after..].find(&to_lower(close_pat))?;
    Some(&s[after..after + cr])
}

/// Byte range of the next `open..close` block at or after `from`.
// `lc` must be `to_lower(s)`; ASCII lowering keeps byte offsets aligned.
fn next_block(s: &str, lc: &str, open: &str, close: &str, from: usize) -> Option<(usize, usize)> {
    let start = lc.get(from..)?.find(open)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(close)?;
    Some((start, open_end + end_rel + close.len()))
}

fn blocks<'a>(s: &'a str, open: &str, close: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((start, end)) = next_block(s, &lc, open, close, pos) {
        out.push(&s[start..end]);
        pos = end;
    }
    out
}

/// All `<tr>` blocks of a table fragment, in document order.
pub fn rows(table: &str) -> Vec<&str> {
    blocks(table, "<tr", "</tr>")
}

/// Inner HTML of the table whose opening tag carries `id="<id>"`. Works for
/// tables the site ships inside HTML comments too.
pub fn table_by_id<'a>(doc: &'a str, id: &str) -> Option<&'a str> {
    let lc = to_lower(doc);
    let needle = to_lower(&format!("id=\"{id}\""));
    let mut from = 0usize;
    while let Some(rel) = lc[from..].find(&needle) {
        let at = from + rel;
        from = at + needle.len();
        let Some(tag_start) = lc[..at].rfind('<') else {
            continue;
        };
        if !lc[tag_start..].starts_with("<table") {
            continue;
        }
        let open_end = doc[at..].find('>')? + at + 1;
        let close = lc[open_end..].find("</table>")?;
        return Some(&doc[open_end..open_end + close]);
    }
    None
}

pub fn attr_value<'a>(open_tag: &'a str, name: &str) -> Option<&'a str> {
    let lc = to_lower(open_tag);
    let needle = format!(" {}=\"", to_lower(name));
    let start = lc.find(&needle)? + needle.len();
    let end = open_tag[start..].find('"')? + start;
    Some(&open_tag[start..end])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCell {
    pub stat: String,
    pub text: String,
    pub href: Option<String>,
}

/// `<th>`/`<td>` cells of one row that carry a `data-stat` attribute.
pub fn stat_cells(row: &str) -> Vec<StatCell> {
    let lc = to_lower(row);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(rel) = lc[pos..].find("<t") {
        let start = pos + rel;
        pos = start + 2;
        let tag = match lc.get(start + 2..start + 4) {
            Some("h ") | Some("h>") => "th",
            Some("d ") | Some("d>") => "td",
            _ => continue,
        };
        let Some(open_len) = row[start..].find('>') else {
            break;
        };
        let open_end = start + open_len + 1;
        let open_tag = &row[start..open_end];
        let close = format!("</{tag}>");
        let Some(close_rel) = lc[open_end..].find(&close) else {
            break;
        };
        let inner = &row[open_end..open_end + close_rel];
        pos = open_end + close_rel + close.len();

        let Some(stat) = attr_value(open_tag, "data-stat") else {
            continue;
        };
        out.push(StatCell {
            stat: stat.to_string(),
            text: strip_tags(inner),
            href: first_href(inner).map(str::to_string),
        });
    }
    out
}

pub fn first_href(fragment: &str) -> Option<&str> {
    let lc = to_lower(fragment);
    let start = lc.find("<a ")?;
    let end = fragment[start..].find('>')? + start + 1;
    attr_value(&fragment[start..end], "href")
}

/// Every `<a href>` in the document whose href starts with `prefix`, as
/// (href, link text).
pub fn links_with_prefix(doc: &str, prefix: &str) -> Vec<(String, String)> {
    blocks(doc, "<a ", "</a>")
        .into_iter()
        .filter_map(|block| {
            let open_len = block.find('>')?;
            let href = attr_value(&block[..open_len + 1], "href")?;
            if !href.starts_with(prefix) {
                return None;
            }
            let inner = &block[open_len + 1..block.len() - "</a>".len()];
            Some((href.to_string(), strip_tags(inner)))
        })
        .collect()
}

pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&decode_entities(&out))
}
