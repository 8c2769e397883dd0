//! File and column naming for shapefile bundles.

/// dBase column names are limited to 10 bytes.
pub const DBF_FIELD_NAME_LEN: usize = 10;

/// dBase character fields hold at most 254 bytes.
pub const DBF_TEXT_LEN: usize = 254;

/// Turn a layer name into a safe directory and file stem.
///
/// Characters outside `[A-Za-z0-9 _.-]` become `_`, whitespace runs collapse
/// to a single `_`, and leading or trailing `.`/`_` are trimmed. A name that
/// ends up empty falls back to `layer_<id>`.
pub fn sanitize_name(name: &str, id: u32) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;

    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
            out.push(c);
        } else {
            out.push('_');
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        format!("layer_{}", id)
    } else {
        trimmed.to_string()
    }
}

/// Truncate `s` to at most `max` bytes without splitting a character.
pub fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// dBase column names for `names`, in the same order.
///
/// Names are truncated to 10 bytes; collisions after truncation get a numeric
/// suffix (`LONGFIEL_1`, `LONGFIEL_2`, ...). Empty names become `FIELD`.
pub fn dbf_field_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut taken: Vec<String> = Vec::with_capacity(names.len());

    for name in names {
        let name = name.as_ref();
        let base = if name.is_empty() {
            "FIELD"
        } else {
            truncate_bytes(name, DBF_FIELD_NAME_LEN)
        };

        let mut candidate = base.to_string();
        let mut n = 1;
        while taken.iter().any(|t| t.eq_ignore_ascii_case(&candidate)) {
            let suffix = format!("_{}", n);
            let stem = truncate_bytes(base, DBF_FIELD_NAME_LEN - suffix.len());
            candidate = format!("{}{}", stem, suffix);
            n += 1;
        }
        taken.push(candidate);
    }

    taken
}
