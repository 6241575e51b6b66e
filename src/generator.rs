//! Core candidate generation: request validation, main-record
//! pre-seeding, and the three-phase shared-set expansion.

use crate::error::{AppError, DuplicateTemplate, Result};
use crate::models::{GeneratedSet, Person, ResultRecord};
use crate::normalize::normalize;
use crate::template::apply_template;
use std::collections::{HashMap, HashSet};

/// Whether a request describes one identity or a roster of them.
///
/// The mode is always set explicitly by the caller; it is never inferred
/// from the person count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GenerationMode {
    SingleUser,
    MultiUser,
}

/// The two supported conventions for the shared-set target count.
///
/// `FromTemplates` derives the target from the template count (minimum 1);
/// `Explicit` uses the caller-supplied number. Callers pick exactly one
/// per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TargetCount {
    FromTemplates,
    Explicit(usize),
}

/// The single explicit input value for one generation run.
#[derive(Debug, Clone)]
pub(crate) struct GenerationRequest {
    pub mode: GenerationMode,
    pub persons: Vec<Person>,
    /// Required; trimmed and lowercased before use.
    pub domain: String,
    /// Applied in input order; order is preserved in the output.
    pub templates: Vec<String>,
    pub target: TargetCount,
    /// When present and non-blank, expanded into the distinguished main
    /// record before shared generation begins.
    pub main_template: Option<String>,
    /// Identity for the main record; falls back to the first person.
    pub main_person: Option<Person>,
    /// Relaxes the pairwise-distinct template validation.
    pub allow_duplicate_templates: bool,
}

impl GenerationRequest {
    pub(crate) fn single_user(
        person: Option<Person>,
        domain: &str,
        templates: Vec<String>,
        target: TargetCount,
    ) -> Self {
        Self {
            mode: GenerationMode::SingleUser,
            persons: person.into_iter().collect(),
            domain: domain.to_string(),
            templates,
            target,
            main_template: None,
            main_person: None,
            allow_duplicate_templates: false,
        }
    }

    pub(crate) fn multi_user(
        persons: Vec<Person>,
        domain: &str,
        templates: Vec<String>,
        target: TargetCount,
    ) -> Self {
        Self {
            mode: GenerationMode::MultiUser,
            persons,
            domain: domain.to_string(),
            templates,
            target,
            main_template: None,
            main_person: None,
            allow_duplicate_templates: false,
        }
    }
}

/// A person paired with the normalized name fragments templates expand
/// against.
struct Identity<'a> {
    person: &'a Person,
    first: String,
    last: String,
}

impl<'a> Identity<'a> {
    fn new(person: &'a Person) -> Self {
        Self {
            person,
            first: normalize(&person.first_name),
            last: normalize(&person.last_name),
        }
    }

    fn expand(&self, template: &str) -> String {
        apply_template(template, &self.first, &self.last)
    }
}

/// Produces the deduplicated, ordered result set for a request.
///
/// Validation failures are reported before any record is generated;
/// under-filling the target (fewer records than requested despite no
/// error) is a normal, silent outcome.
pub(crate) fn generate(request: &GenerationRequest) -> Result<GeneratedSet> {
    let domain = request.domain.trim().to_lowercase();
    if domain.is_empty() {
        return Err(AppError::MissingDomain);
    }

    let templates: Vec<String> = request
        .templates
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if !request.allow_duplicate_templates {
        let duplicates = find_duplicates(&templates);
        if !duplicates.is_empty() {
            return Err(AppError::DuplicateTemplates(duplicates));
        }
    }

    let invalid: Vec<String> = templates
        .iter()
        .filter(|t| t.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .cloned()
        .collect();
    if !invalid.is_empty() {
        return Err(AppError::InvalidTemplates(invalid));
    }

    match request.mode {
        GenerationMode::MultiUser if request.persons.is_empty() => {
            return Err(AppError::NoValidPersons);
        }
        GenerationMode::SingleUser if templates.is_empty() => {
            return Err(AppError::EmptyTemplateList);
        }
        _ => {}
    }

    let base_target = match request.target {
        TargetCount::FromTemplates => templates.len().max(1),
        TargetCount::Explicit(n) => n,
    };
    // Phase 1's per-person guarantee must not be defeated by a target
    // smaller than the roster.
    let capacity = match request.mode {
        GenerationMode::MultiUser => base_target.max(request.persons.len()),
        GenerationMode::SingleUser => base_target,
    };

    tracing::debug!(
        "Generating up to {} shared record(s) from {} template(s) @ {}",
        capacity,
        templates.len(),
        domain
    );

    let fallback = Person::default();
    let identities: Vec<Identity> = match request.mode {
        GenerationMode::SingleUser => {
            vec![Identity::new(request.persons.first().unwrap_or(&fallback))]
        }
        GenerationMode::MultiUser => request.persons.iter().map(Identity::new).collect(),
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut shared: Vec<ResultRecord> = Vec::new();

    // The main record is registered first so shared generation can never
    // collide with it.
    let mut main: Option<ResultRecord> = None;
    if let Some(template) = request
        .main_template
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        let person = request
            .main_person
            .as_ref()
            .or_else(|| request.persons.first())
            .unwrap_or(&fallback);
        let local = normalize(&Identity::new(person).expand(template));
        if local.is_empty() {
            tracing::debug!("Main template '{}' expanded to an empty local-part", template);
        } else {
            let username = format!("{}@{}", local, domain);
            seen.insert(username.clone());
            main = Some(ResultRecord::new(person, username, &domain));
        }
    }

    // Phase 1: direct coverage, in template order. Multi-user mode stops
    // at the first success per person so no one is left without an
    // address while capacity remains.
    match request.mode {
        GenerationMode::SingleUser => {
            if let Some(identity) = identities.first() {
                for template in &templates {
                    if shared.len() >= capacity {
                        break;
                    }
                    register(
                        &identity.expand(template),
                        identity.person,
                        &domain,
                        &mut seen,
                        &mut shared,
                    );
                }
            }
        }
        GenerationMode::MultiUser => {
            for identity in &identities {
                if shared.len() >= capacity {
                    break;
                }
                for template in &templates {
                    if register(
                        &identity.expand(template),
                        identity.person,
                        &domain,
                        &mut seen,
                        &mut shared,
                    ) {
                        break;
                    }
                }
            }

            // Phase 2: round-robin completion over every remaining
            // (template, person) pair.
            if shared.len() < capacity && templates.len() > 1 {
                'pairs: for template in &templates {
                    for identity in &identities {
                        if shared.len() >= capacity {
                            break 'pairs;
                        }
                        register(
                            &identity.expand(template),
                            identity.person,
                            &domain,
                            &mut seen,
                            &mut shared,
                        );
                    }
                }
            }
        }
    }

    // Phase 3: numeric-suffix extension. A full pass that adds nothing
    // ends the phase, so an empty base set under-fills instead of looping.
    if shared.len() < capacity {
        match request.mode {
            GenerationMode::SingleUser => {
                if let Some(identity) = identities.first() {
                    let bases: Vec<String> = shared
                        .iter()
                        .map(|record| local_part(&record.username).to_string())
                        .collect();
                    if !bases.is_empty() {
                        let mut n: u64 = 1;
                        while shared.len() < capacity {
                            let mut progressed = false;
                            for base in &bases {
                                if shared.len() >= capacity {
                                    break;
                                }
                                if register(
                                    &format!("{}{}", base, n),
                                    identity.person,
                                    &domain,
                                    &mut seen,
                                    &mut shared,
                                ) {
                                    progressed = true;
                                }
                            }
                            if !progressed {
                                break;
                            }
                            n += 1;
                        }
                    }
                }
            }
            GenerationMode::MultiUser => {
                let mut n: u64 = 1;
                while shared.len() < capacity {
                    let mut progressed = false;
                    'pass: for template in &templates {
                        for identity in &identities {
                            if shared.len() >= capacity {
                                break 'pass;
                            }
                            let base = normalize(&identity.expand(template));
                            if base.is_empty() {
                                continue;
                            }
                            if register(
                                &format!("{}{}", base, n),
                                identity.person,
                                &domain,
                                &mut seen,
                                &mut shared,
                            ) {
                                progressed = true;
                            }
                        }
                    }
                    if !progressed {
                        break;
                    }
                    n += 1;
                }
            }
        }
    }

    shared.truncate(capacity);

    tracing::debug!(
        "Generated {} shared record(s) (effective target {})",
        shared.len(),
        capacity
    );

    Ok(GeneratedSet { main, shared })
}

/// Collects templates appearing more than once, each listed once with its
/// count, in first-appearance order.
fn find_duplicates(templates: &[String]) -> Vec<DuplicateTemplate> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for template in templates {
        *counts.entry(template.as_str()).or_insert(0) += 1;
    }

    let mut reported: HashSet<&str> = HashSet::new();
    let mut duplicates = Vec::new();
    for template in templates {
        let count = counts[template.as_str()];
        if count > 1 && reported.insert(template.as_str()) {
            duplicates.push(DuplicateTemplate {
                template: template.clone(),
                count,
            });
        }
    }
    duplicates
}

/// Normalizes a candidate local-part and appends a record when the result
/// is non-empty and its username is unseen. Returns whether a record was
/// added.
fn register(
    candidate: &str,
    person: &Person,
    domain: &str,
    seen: &mut HashSet<String>,
    shared: &mut Vec<ResultRecord>,
) -> bool {
    let local = normalize(candidate);
    if local.is_empty() {
        return false;
    }
    let username = format!("{}@{}", local, domain);
    if !seen.insert(username.clone()) {
        return false;
    }
    shared.push(ResultRecord::new(person, username, domain));
    true
}

fn local_part(username: &str) -> &str {
    username.split('@').next().unwrap_or(username)
}
