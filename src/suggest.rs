//! Random sampling of username templates for callers that want
//! suggestions instead of hand-authored patterns.

use rand::Rng;
use rand::seq::SliceRandom;

/// Hand-authored catalog of common username templates.
pub(crate) const TEMPLATE_CATALOG: [&str; 25] = [
    "{first}.{last}",
    "{first}{last}",
    "{f}.{last}",
    "{f}{last}",
    "{first}.{l}",
    "{first}{l}",
    "{f}.{l}",
    "{first}_{last}",
    "{first}-{last}",
    "{last}.{first}",
    "{last}{first}",
    "{last}.{f}",
    "{last}{f}",
    "{l}.{first}",
    "{l}{first}",
    "{first}",
    "{last}",
    "{first}123",
    "{last}123",
    "{f}{l}",
    "{first}2024",
    "{first}01",
    "{last}01",
    "{first}.{last}01",
    "{f}.{last}2024",
];

/// Bases used to manufacture extra variations once the catalog runs out.
const VARIATION_BASES: [&str; 5] = [
    "{first}",
    "{last}",
    "{first}.{last}",
    "{f}.{last}",
    "{first}{last}",
];

/// Recent years plus a few evergreen reference years.
const YEAR_POOL: [&str; 8] = [
    "2023", "2024", "2025", "2026", "2027", "2020", "2000", "1999",
];

const NUMBER_POOL: [&str; 6] = ["1", "01", "007", "99", "123", "321"];

/// Samples `count` template suggestions from the catalog.
///
/// The catalog is shuffled with an unbiased permutation and truncated.
/// When `count` exceeds the catalog, random base+year and base+number
/// variations are appended until the list is long enough, then the whole
/// list is shuffled once more and cut to exactly `count`.
///
/// Output templates are suggestions only and are not deduplicated; the
/// generator's own duplicate policy governs downstream.
pub(crate) fn sample_templates<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<String> {
    let mut selected: Vec<String> = TEMPLATE_CATALOG.iter().map(|t| t.to_string()).collect();
    selected.shuffle(rng);

    if count <= selected.len() {
        selected.truncate(count);
        tracing::debug!("Sampled {} template(s) from the catalog", selected.len());
        return selected;
    }

    while selected.len() < count {
        // Growth guard against pathological fill loops.
        if selected.len() > count * 2 {
            break;
        }
        let base = VARIATION_BASES[rng.gen_range(0..VARIATION_BASES.len())];
        let suffix = if rng.gen_bool(0.5) {
            YEAR_POOL[rng.gen_range(0..YEAR_POOL.len())]
        } else {
            NUMBER_POOL[rng.gen_range(0..NUMBER_POOL.len())]
        };
        selected.push(format!("{}{}", base, suffix));
    }

    selected.shuffle(rng);
    selected.truncate(count);
    tracing::debug!("Sampled {} template(s) with variations", selected.len());
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::apply_template;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sample_within_catalog() {
        let mut rng = StdRng::seed_from_u64(7);
        let templates = sample_templates(5, &mut rng);

        assert_eq!(templates.len(), 5);
        for template in &templates {
            assert!(
                TEMPLATE_CATALOG.contains(&template.as_str()),
                "{} not in catalog",
                template
            );
        }
        // Catalog entries are distinct, so a sample without variations is
        // duplicate-free.
        let mut deduped = templates.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 5);
    }

    #[test]
    fn test_sample_is_reproducible_for_a_seed() {
        let mut first_rng = StdRng::seed_from_u64(42);
        let mut second_rng = StdRng::seed_from_u64(42);
        assert_eq!(
            sample_templates(5, &mut first_rng),
            sample_templates(5, &mut second_rng)
        );

        let mut first_rng = StdRng::seed_from_u64(42);
        let mut second_rng = StdRng::seed_from_u64(42);
        assert_eq!(
            sample_templates(60, &mut first_rng),
            sample_templates(60, &mut second_rng)
        );
    }

    #[test]
    fn test_sample_beyond_catalog_extends() {
        let mut rng = StdRng::seed_from_u64(3);
        let templates = sample_templates(60, &mut rng);
        assert_eq!(templates.len(), 60);
    }

    #[test]
    fn test_sampled_templates_expand_cleanly() {
        let mut rng = StdRng::seed_from_u64(11);
        for template in sample_templates(80, &mut rng) {
            let expanded = apply_template(&template, "john", "smith");
            assert!(
                !expanded.contains('{') && !expanded.contains('}'),
                "unrecognized placeholder in {}",
                template
            );
        }
    }

    #[test]
    fn test_sample_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_templates(0, &mut rng).is_empty());
    }

    #[test]
    fn test_exact_count_matches_catalog_size() {
        let mut rng = StdRng::seed_from_u64(5);
        let templates = sample_templates(TEMPLATE_CATALOG.len(), &mut rng);
        assert_eq!(templates.len(), TEMPLATE_CATALOG.len());
    }
}
