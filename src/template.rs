//! Placeholder substitution for username templates.

/// Expands the placeholder tokens in `template` using the already
/// normalized first and last names.
///
/// `{first}` and `{last}` expand to the full names, `{fi}`/`{f}` and
/// `{li}`/`{l}` to the first character of the corresponding name (or
/// nothing when the name is empty). Anything else passes through
/// literally. The output is not re-normalized here; callers normalize the
/// candidate when it is registered.
pub(crate) fn apply_template(template: &str, first_norm: &str, last_norm: &str) -> String {
    let fi = first_norm
        .chars()
        .next()
        .map(String::from)
        .unwrap_or_default();
    let li = last_norm
        .chars()
        .next()
        .map(String::from)
        .unwrap_or_default();

    // {fi}/{li} must be rewritten before {f}/{l}: a literal scan for the
    // one-character token would otherwise clip the longer spelling.
    template
        .replace("{first}", first_norm)
        .replace("{last}", last_norm)
        .replace("{fi}", &fi)
        .replace("{li}", &li)
        .replace("{f}", &fi)
        .replace("{l}", &li)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_template_basic() {
        assert_eq!(apply_template("{f}.{last}", "john", "smith"), "j.smith");
        assert_eq!(apply_template("{first}{last}", "jane", "doe"), "janedoe");
        assert_eq!(apply_template("{first}.{l}", "jane", "doe"), "jane.d");
    }

    #[test]
    fn test_apply_template_long_initial_tokens() {
        assert_eq!(apply_template("{fi}{li}", "john", "smith"), "js");
        assert_eq!(apply_template("{fi}.{f}", "john", "smith"), "j.j");
    }

    #[test]
    fn test_apply_template_literal_passthrough() {
        assert_eq!(apply_template("admin", "john", "smith"), "admin");
        assert_eq!(apply_template("{unknown}", "john", "smith"), "{unknown}");
        assert_eq!(apply_template("user{first}", "john", "smith"), "userjohn");
    }

    #[test]
    fn test_apply_template_empty_names() {
        assert_eq!(apply_template("{f}{last}", "", ""), "");
        assert_eq!(apply_template("{first}.{l}", "", "doe"), ".d");
    }

    #[test]
    fn test_apply_template_repeated_tokens() {
        assert_eq!(apply_template("{f}{f}{last}", "john", "smith"), "jjsmith");
    }
}
