//! "Did you mean" suggestions for unknown command names.

use strsim::levenshtein;

/// Suggests the candidate closest to `input` by Levenshtein distance.
///
/// Returns `None` unless some candidate is within distance 2; ties keep
/// the earlier candidate, so suggestion output is stable for a fixed
/// candidate order.
///
/// # Examples
///
/// ```
/// use command_bind_render::suggest;
///
/// let commands = ["add", "list", "tag"];
/// assert_eq!(suggest("lst", commands.iter().copied()), Some("list".to_string()));
/// assert_eq!(suggest("unrelated", commands.iter().copied()), None);
/// ```
pub fn suggest<'a>(input: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let input = input.to_lowercase();
    let mut best: Option<(&str, usize)> = None;

    for candidate in candidates {
        let distance = levenshtein(&input, candidate);
        if distance > 2 {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    best.map(|(candidate, _)| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMANDS: &[&str] = &["add", "list", "tag", "archive"];

    #[test]
    fn test_suggest_close_match() {
        assert_eq!(
            suggest("lits", COMMANDS.iter().copied()),
            Some("list".to_string())
        );
        assert_eq!(
            suggest("tga", COMMANDS.iter().copied()),
            Some("tag".to_string())
        );
    }

    #[test]
    fn test_suggest_is_case_insensitive() {
        assert_eq!(
            suggest("LIST", COMMANDS.iter().copied()),
            Some("list".to_string())
        );
    }

    #[test]
    fn test_suggest_rejects_distant_input() {
        assert_eq!(suggest("synchronize", COMMANDS.iter().copied()), None);
    }

    #[test]
    fn test_suggest_prefers_the_closest_candidate() {
        let candidates = ["tags", "tag"];
        assert_eq!(
            suggest("tag", candidates.iter().copied()),
            Some("tag".to_string())
        );
    }

    #[test]
    fn test_ties_keep_the_earlier_candidate() {
        let candidates = ["ls", "la"];
        assert_eq!(
            suggest("lz", candidates.iter().copied()),
            Some("ls".to_string())
        );
    }
}
