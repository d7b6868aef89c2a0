use anyhow::{anyhow, Context, Result};
use regex::Regex;
use scraper::{Html, Selector};

/// Where a rule looks for its raw value.
#[derive(Debug, Clone)]
pub enum Locator {
    /// CSS selector; takes the element's text, or the named attribute.
    Css {
        selector: &'static str,
        attr: Option<&'static str>,
    },
    /// Regex over the document's plain text; `group` is kept.
    Pattern { pattern: &'static str, group: usize },
    /// Fixed value, for fields a source implies rather than states.
    Const { value: &'static str },
}

/// Validity predicate a candidate value must meet before it wins.
#[derive(Debug, Clone)]
pub struct Validity {
    pub min_len: usize,
    pub max_len: usize,
    /// Minimum for the digits embedded in the value, e.g. price >= 1000.
    pub min_number: Option<u64>,
}

impl Default for Validity {
    fn default() -> Self {
        Self {
            min_len: 1,
            max_len: 400,
            min_number: None,
        }
    }
}

/// One declarative extraction rule. Rules for a field are tried in
/// order; the first match that passes validity wins.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub locator: Locator,
    /// Sub-extraction applied to the located text. Group 1 is kept if
    /// the pattern captures, otherwise the whole match.
    pub refine: Option<&'static str>,
    /// Unit suffix appended after validation, e.g. " miles".
    pub suffix: Option<&'static str>,
    pub validity: Validity,
}

impl RuleSpec {
    pub fn css(selector: &'static str) -> Self {
        Self {
            locator: Locator::Css {
                selector,
                attr: None,
            },
            refine: None,
            suffix: None,
            validity: Validity::default(),
        }
    }

    pub fn css_attr(selector: &'static str, attr: &'static str) -> Self {
        Self {
            locator: Locator::Css {
                selector,
                attr: Some(attr),
            },
            refine: None,
            suffix: None,
            validity: Validity::default(),
        }
    }

    /// Regex rule over plain text, keeping capture group 1.
    pub fn pattern(pattern: &'static str) -> Self {
        Self {
            locator: Locator::Pattern { pattern, group: 1 },
            refine: None,
            suffix: None,
            validity: Validity::default(),
        }
    }

    /// Regex rule keeping the whole match.
    pub fn pattern_whole(pattern: &'static str) -> Self {
        Self {
            locator: Locator::Pattern { pattern, group: 0 },
            refine: None,
            suffix: None,
            validity: Validity::default(),
        }
    }

    /// Rule that always yields the given value.
    pub fn constant(value: &'static str) -> Self {
        Self {
            locator: Locator::Const { value },
            refine: None,
            suffix: None,
            validity: Validity::default(),
        }
    }

    pub fn refine(mut self, pattern: &'static str) -> Self {
        self.refine = Some(pattern);
        self
    }

    pub fn suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = Some(suffix);
        self
    }

    pub fn len(mut self, min: usize, max: usize) -> Self {
        self.validity.min_len = min;
        self.validity.max_len = max;
        self
    }

    pub fn min_number(mut self, min: u64) -> Self {
        self.validity.min_number = Some(min);
        self
    }
}

enum CompiledLocator {
    Css {
        selector: Selector,
        attr: Option<&'static str>,
    },
    Pattern {
        regex: Regex,
        group: usize,
    },
    Const {
        value: &'static str,
    },
}

/// A [`RuleSpec`] with its selector/patterns compiled. Compilation
/// happens once at catalog construction; application is allocation-light.
pub struct FieldRule {
    locator: CompiledLocator,
    refine: Option<Regex>,
    suffix: Option<&'static str>,
    validity: Validity,
}

impl FieldRule {
    pub fn compile(spec: RuleSpec) -> Result<Self> {
        let locator = match spec.locator {
            Locator::Css { selector, attr } => CompiledLocator::Css {
                selector: Selector::parse(selector)
                    .map_err(|e| anyhow!("bad selector {selector:?}: {e:?}"))?,
                attr,
            },
            Locator::Pattern { pattern, group } => CompiledLocator::Pattern {
                regex: Regex::new(pattern).with_context(|| format!("bad pattern {pattern:?}"))?,
                group,
            },
            Locator::Const { value } => CompiledLocator::Const { value },
        };
        let refine = spec
            .refine
            .map(|p| Regex::new(p).with_context(|| format!("bad refine pattern {p:?}")))
            .transpose()?;
        Ok(Self {
            locator,
            refine,
            suffix: spec.suffix,
            validity: spec.validity,
        })
    }

    /// Applies the rule against the parsed document (CSS locators) or
    /// its plain-text form (pattern locators). Returns the cleaned,
    /// validated value, or None.
    pub fn apply(&self, document: &Html, text: &str) -> Option<String> {
        let raw = match &self.locator {
            CompiledLocator::Css { selector, attr } => document.select(selector).find_map(|el| {
                let candidate = match attr {
                    Some(attr) => el.value().attr(attr).map(str::to_string),
                    None => Some(el.text().collect::<String>()),
                };
                candidate
                    .map(|c| normalize_whitespace(&c))
                    .filter(|c| !c.is_empty())
            }),
            CompiledLocator::Pattern { regex, group } => regex
                .captures(text)
                .and_then(|caps| caps.get(*group))
                .map(|m| normalize_whitespace(m.as_str())),
            CompiledLocator::Const { value } => Some((*value).to_string()),
        }?;

        let refined = match &self.refine {
            Some(regex) => {
                let caps = regex.captures(&raw)?;
                let m = caps.get(1).or_else(|| caps.get(0))?;
                normalize_whitespace(m.as_str())
            }
            None => raw,
        };

        if !self.validity.accepts(&refined) {
            return None;
        }

        Some(match self.suffix {
            Some(suffix) => format!("{refined}{suffix}"),
            None => refined,
        })
    }
}

impl Validity {
    pub fn accepts(&self, value: &str) -> bool {
        if value.len() < self.min_len || value.len() > self.max_len {
            return false;
        }
        if let Some(min) = self.min_number {
            let digits: String = value.chars().filter(char::is_ascii_digit).collect();
            match digits.parse::<u64>() {
                Ok(n) if n >= min => {}
                _ => return false,
            }
        }
        true
    }
}

/// Collapses runs of whitespace to single spaces and trims.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn css_rule_takes_first_nonempty_text() {
        let html = doc("<h1 class=\"vehicle-title\"> </h1><h1 class=\"vehicle-title\">2021 Toyota Camry LE</h1>");
        let rule = FieldRule::compile(RuleSpec::css("h1.vehicle-title")).unwrap();
        assert_eq!(
            rule.apply(&html, "").as_deref(),
            Some("2021 Toyota Camry LE")
        );
    }

    #[test]
    fn css_attr_rule_reads_the_attribute() {
        let html = doc("<img class=\"photo\" data-src=\"/img/1.jpg\">");
        let rule = FieldRule::compile(RuleSpec::css_attr("img.photo", "data-src")).unwrap();
        assert_eq!(rule.apply(&html, "").as_deref(), Some("/img/1.jpg"));
    }

    #[test]
    fn pattern_rule_captures_from_plain_text() {
        let html = doc("<p></p>");
        let rule =
            FieldRule::compile(RuleSpec::pattern(r"(?i)odometer[:\s]+(\d{1,3}(?:,\d{3})*)\s*KM"))
                .unwrap();
        assert_eq!(
            rule.apply(&html, "Odometer: 45,000 KM Showing").as_deref(),
            Some("45,000")
        );
    }

    #[test]
    fn refine_and_suffix_clean_the_value() {
        let html = doc("<span class=\"mileage\">Mileage: 32,000 mi. listed</span>");
        let rule = FieldRule::compile(
            RuleSpec::css("span.mileage")
                .refine(r"([\d,]{2,})")
                .suffix(" miles"),
        )
        .unwrap();
        assert_eq!(rule.apply(&html, "").as_deref(), Some("32,000 miles"));
    }

    #[test]
    fn numeric_threshold_rejects_small_values() {
        let html = doc("<span class=\"price\">$500</span><div class=\"price\">$22,500</div>");
        let rule = FieldRule::compile(
            RuleSpec::css("div.price")
                .refine(r"\$[\d,]+")
                .min_number(1000),
        )
        .unwrap();
        assert_eq!(rule.apply(&html, "").as_deref(), Some("$22,500"));

        let low = FieldRule::compile(
            RuleSpec::css("span.price")
                .refine(r"\$[\d,]+")
                .min_number(1000),
        )
        .unwrap();
        assert_eq!(low.apply(&html, ""), None);
    }

    #[test]
    fn length_bounds_reject_junk() {
        let html = doc("<div class=\"colour\">this is far too long to be a paint colour name</div>");
        let rule = FieldRule::compile(RuleSpec::css("div.colour").len(2, 20)).unwrap();
        assert_eq!(rule.apply(&html, ""), None);
    }
}
