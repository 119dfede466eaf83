//! Resource Filter — removes resources that are out of area, ineligible, or not
//! meant for the public. Runs strictly before scoring.

use crate::matching::profile::{CallerContext, FEMALE, MALE};
use crate::matching::vocabulary::Vocabulary;
use crate::models::resource::Resource;

const EXCLUDED_CATEGORY: &str = "training";
const EXCLUDED_STATUS: &str = "outdated";
const EXCLUDED_DESCRIPTIONS: &[&str] = &["training program", "not for public use"];

const TEEN_AGE_MIN: u32 = 12;
const TEEN_AGE_MAX: u32 = 19;
const ADULT_AGE: u32 = 18;

/// Returns the eligible subset of `resources`, preserving input order.
pub fn filter_resources<'a>(
    resources: &'a [Resource],
    context: &CallerContext,
    vocabulary: &Vocabulary,
) -> Vec<&'a Resource> {
    resources
        .iter()
        .filter(|resource| passes(resource, context, vocabulary))
        .collect()
}

pub fn passes(resource: &Resource, context: &CallerContext, vocabulary: &Vocabulary) -> bool {
    !is_excluded(resource)
        && location_ok(resource, context, vocabulary)
        && eligibility_ok(resource, context)
}

/// Location rule. An unknown or undetected bucket places no constraint, and
/// neither does a resource without service-area text.
pub fn location_ok(resource: &Resource, context: &CallerContext, vocabulary: &Vocabulary) -> bool {
    let Some(bucket) = context
        .location
        .as_deref()
        .and_then(|label| vocabulary.location(label))
    else {
        return true;
    };

    resource
        .service_area
        .contains_any(bucket.service_area_terms.as_slice())
        .unwrap_or(true)
}

/// Eligibility rule over the free-text eligibility field. Absent text passes.
pub fn eligibility_ok(resource: &Resource, context: &CallerContext) -> bool {
    let eligibility = &resource.eligibility;
    if eligibility.is_absent() {
        return true;
    }
    let says = |phrase: &str| eligibility.contains(phrase) == Some(true);

    if says("adults only") && context.age.is_some_and(|age| age < ADULT_AGE) {
        return false;
    }

    if says("teens only")
        && !context.is_teen()
        && context
            .age
            .map_or(true, |age| !(TEEN_AGE_MIN..=TEEN_AGE_MAX).contains(&age))
    {
        return false;
    }

    let gender = context.gender.as_deref();
    if says("women only") && gender == Some(MALE) {
        return false;
    }
    // "women only" contains "men only": female callers fail this check too.
    if says("men only") && gender == Some(FEMALE) {
        return false;
    }

    true
}

/// Training material, outdated entries and internal-only programs never reach callers.
pub fn is_excluded(resource: &Resource) -> bool {
    resource.category.contains(EXCLUDED_CATEGORY) == Some(true)
        || resource
            .status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case(EXCLUDED_STATUS))
        || resource.description.contains_any(EXCLUDED_DESCRIPTIONS) == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resource::TextField;

    fn resource(name: &str) -> Resource {
        Resource {
            name: name.to_string(),
            ..Resource::default()
        }
    }

    fn with_area(name: &str, area: &str) -> Resource {
        Resource {
            service_area: TextField::new(area),
            ..resource(name)
        }
    }

    fn with_eligibility(name: &str, eligibility: &str) -> Resource {
        Resource {
            eligibility: TextField::new(eligibility),
            ..resource(name)
        }
    }

    fn ctx_at(location: &str) -> CallerContext {
        CallerContext {
            location: Some(location.to_string()),
            ..CallerContext::default()
        }
    }

    #[test]
    fn test_no_location_passes_everything() {
        let vocab = Vocabulary::default();
        let r = with_area("Memphis Shelter", "Memphis");
        assert!(location_ok(&r, &CallerContext::default(), &vocab));
    }

    #[test]
    fn test_davidson_location_rules() {
        let vocab = Vocabulary::default();
        let ctx = ctx_at("Davidson");
        assert!(location_ok(&with_area("a", "Greater Nashville area"), &ctx, &vocab));
        assert!(location_ok(&with_area("b", "Statewide"), &ctx, &vocab));
        assert!(location_ok(&resource("c"), &ctx, &vocab), "no service area is unconstrained");
        assert!(!location_ok(&with_area("d", "Sumner County"), &ctx, &vocab));
    }

    #[test]
    fn test_middle_tennessee_location_rules() {
        let vocab = Vocabulary::default();
        let ctx = ctx_at("Middle TN Outside Davidson");
        assert!(location_ok(&with_area("a", "Rutherford County"), &ctx, &vocab));
        assert!(location_ok(&with_area("b", "Middle Tennessee"), &ctx, &vocab));
        assert!(!location_ok(&with_area("c", "Nashville"), &ctx, &vocab));
    }

    #[test]
    fn test_adults_only_excludes_minors() {
        let r = with_eligibility("Adult Clinic", "Adults only, 18+");
        let minor = CallerContext {
            age: Some(17),
            ..CallerContext::default()
        };
        let adult = CallerContext {
            age: Some(30),
            ..CallerContext::default()
        };
        assert!(!eligibility_ok(&r, &minor));
        assert!(eligibility_ok(&r, &adult));
        assert!(eligibility_ok(&r, &CallerContext::default()), "unknown age passes");
    }

    #[test]
    fn test_teens_only_rules() {
        let r = with_eligibility("Teen Line", "Teens only");
        let teen_group = CallerContext {
            age_group: Some("teen".to_string()),
            ..CallerContext::default()
        };
        let fifteen = CallerContext {
            age: Some(15),
            ..CallerContext::default()
        };
        let forty = CallerContext {
            age: Some(40),
            ..CallerContext::default()
        };
        assert!(eligibility_ok(&r, &teen_group));
        assert!(eligibility_ok(&r, &fifteen));
        assert!(!eligibility_ok(&r, &forty));
        assert!(!eligibility_ok(&r, &CallerContext::default()));
    }

    #[test]
    fn test_gender_restrictions() {
        let male = CallerContext {
            gender: Some(MALE.to_string()),
            ..CallerContext::default()
        };
        let female = CallerContext {
            gender: Some(FEMALE.to_string()),
            ..CallerContext::default()
        };
        assert!(!eligibility_ok(&with_eligibility("w", "Women only"), &male));
        assert!(!eligibility_ok(&with_eligibility("m", "Men only"), &female));
        assert!(eligibility_ok(&with_eligibility("m", "Men only"), &male));
        assert!(!eligibility_ok(&with_eligibility("w", "Women only"), &female));
    }

    #[test]
    fn test_exclusions() {
        let training = Resource {
            category: TextField::new("Staff Training"),
            ..resource("t")
        };
        let outdated = Resource {
            status: TextField::new("OUTDATED"),
            ..resource("o")
        };
        let internal = Resource {
            description: TextField::new("Internal tool, not for public use"),
            ..resource("i")
        };
        assert!(is_excluded(&training));
        assert!(is_excluded(&outdated));
        assert!(is_excluded(&internal));
        assert!(!is_excluded(&resource("fine")));
    }

    #[test]
    fn test_filter_preserves_order() {
        let vocab = Vocabulary::default();
        let resources = vec![
            resource("first"),
            Resource {
                category: TextField::new("training"),
                ..resource("dropped")
            },
            resource("second"),
        ];
        let names: Vec<_> = filter_resources(&resources, &CallerContext::default(), &vocab)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, ["first", "second"]);
    }
}
