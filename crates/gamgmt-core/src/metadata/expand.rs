//! Templated column expansion.
//!
//! The metadata API returns some columns as templates: their id and `uiName`
//! contain a placeholder token (`XX`) and their attributes declare template
//! index bounds. Before a column list can be used for a specific account,
//! property, and view, each template is replaced by concrete columns.
//!
//! Expansion is an ordered list of rules. For each input column the rules are
//! tried in order; the first rule returning `Some` claims the column and its
//! output (possibly empty) is appended. Unclaimed columns are copied through.
//!
//! Default rule order:
//! - `custom_metric`: `ga:metricXX` → one column per custom metric
//! - `custom_dimension`: `ga:dimensionXX` → one column per custom dimension
//! - `goal`: ids containing "goal" → one column per goal
//! - `template_range`: any other template → one column per index in bounds
//!
//! Input columns are never modified; every produced column is a fresh clone.

use std::collections::BTreeMap;

use crate::config::{validate_config, ExpansionConfig};
use crate::errors::MgmtResult;
use crate::model::{Column, TemplateSource};

/// Account-specific inputs for one expansion run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpansionContext<'a> {
    pub custom_metrics: &'a [TemplateSource],
    pub custom_dimensions: &'a [TemplateSource],
    pub goals: &'a [TemplateSource],
    /// Selects premium template bounds when a column declares them.
    pub is_premium: bool,
}

/// A column expansion rule.
///
/// Rules must not depend on anything but the column and the context.
pub trait ExpansionRule {
    fn id(&self) -> &str;

    /// Return `Some(columns)` to claim `column`, `None` to pass.
    fn apply(&self, column: &Column, ctx: &ExpansionContext<'_>) -> Option<Vec<Column>>;
}

/// Per-rule counters collected by [`ColumnExpander::expand_with_report`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleStats {
    /// Template columns claimed by the rule.
    pub claimed: usize,
    /// Concrete columns the rule produced.
    pub produced: usize,
}

/// Expansion output plus diagnostics.
#[derive(Debug, Clone)]
pub struct ExpansionReport {
    pub columns: Vec<Column>,
    pub rules: BTreeMap<String, RuleStats>,
    pub passed_through: usize,
}

/// Ordered list of expansion rules.
pub struct ColumnExpander {
    rules: Vec<Box<dyn ExpansionRule + Send + Sync>>,
}

impl ColumnExpander {
    /// An expander with no rules; every column passes through.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The default rule list for the given template conventions.
    pub fn with_config(cfg: &ExpansionConfig) -> MgmtResult<Self> {
        validate_config(cfg)?;
        Ok(Self::default_rules(cfg))
    }

    fn default_rules(cfg: &ExpansionConfig) -> Self {
        let mut e = Self::new();
        e.push_rule(CustomEntityRule {
            id: "custom_metric",
            template_id: cfg.custom_metric_template.clone(),
            label: "Custom Metric",
            sources: |ctx| ctx.custom_metrics,
        })
        .push_rule(CustomEntityRule {
            id: "custom_dimension",
            template_id: cfg.custom_dimension_template.clone(),
            label: "Custom Dimension",
            sources: |ctx| ctx.custom_dimensions,
        })
        .push_rule(GoalRule {
            placeholder: cfg.placeholder.clone(),
            pattern: cfg.goal_pattern.to_lowercase(),
        })
        .push_rule(TemplateRangeRule {
            placeholder: cfg.placeholder.clone(),
        });
        e
    }

    pub fn push_rule<R: ExpansionRule + Send + Sync + 'static>(&mut self, rule: R) -> &mut Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Rule ids in evaluation order.
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn expand(&self, columns: &[Column], ctx: &ExpansionContext<'_>) -> Vec<Column> {
        self.expand_with_report(columns, ctx).columns
    }

    pub fn expand_with_report(&self, columns: &[Column], ctx: &ExpansionContext<'_>) -> ExpansionReport {
        let mut out = Vec::with_capacity(columns.len());
        let mut stats: BTreeMap<String, RuleStats> = self
            .rules
            .iter()
            .map(|r| (r.id().to_string(), RuleStats::default()))
            .collect();
        let mut passed_through = 0;

        for column in columns {
            let claimed = self
                .rules
                .iter()
                .find_map(|r| r.apply(column, ctx).map(|cols| (r.id(), cols)));

            match claimed {
                Some((rule_id, produced)) => {
                    tracing::trace!(column = %column.id, rule = rule_id, produced = produced.len(), "expanded template column");
                    let s = stats.entry(rule_id.to_string()).or_default();
                    s.claimed += 1;
                    s.produced += produced.len();
                    out.extend(produced);
                }
                None => {
                    passed_through += 1;
                    out.push(column.clone());
                }
            }
        }

        tracing::debug!(
            input = columns.len(),
            output = out.len(),
            passed_through,
            "expanded column templates"
        );

        ExpansionReport {
            columns: out,
            rules: stats,
            passed_through,
        }
    }
}

impl Default for ColumnExpander {
    fn default() -> Self {
        Self::default_rules(&ExpansionConfig::default())
    }
}

/// Expand `columns` with the default rules.
pub fn populate_columns(
    columns: &[Column],
    custom_metrics: &[TemplateSource],
    custom_dimensions: &[TemplateSource],
    goals: &[TemplateSource],
    is_premium: bool,
) -> Vec<Column> {
    let ctx = ExpansionContext {
        custom_metrics,
        custom_dimensions,
        goals,
        is_premium,
    };
    ColumnExpander::default().expand(columns, &ctx)
}

/// Replaces one exact template id with one column per custom entity.
struct CustomEntityRule {
    id: &'static str,
    template_id: String,
    label: &'static str,
    sources: for<'a> fn(&ExpansionContext<'a>) -> &'a [TemplateSource],
}

impl ExpansionRule for CustomEntityRule {
    fn id(&self) -> &str {
        self.id
    }

    fn apply(&self, column: &Column, ctx: &ExpansionContext<'_>) -> Option<Vec<Column>> {
        if !column.attributes.has_template_bounds() || column.id != self.template_id {
            return None;
        }

        let produced = (self.sources)(ctx)
            .iter()
            .enumerate()
            .map(|(i, source)| {
                let mut c = column.clone();
                c.id = source.id.to_string();
                c.attributes
                    .set_ui_name(format!("{} ({} {})", source.name, self.label, i + 1));
                c
            })
            .collect();
        Some(produced)
    }
}

/// Replaces goal templates with one column per goal.
struct GoalRule {
    placeholder: String,
    /// Lowercased pattern.
    pattern: String,
}

impl ExpansionRule for GoalRule {
    fn id(&self) -> &str {
        "goal"
    }

    fn apply(&self, column: &Column, ctx: &ExpansionContext<'_>) -> Option<Vec<Column>> {
        if !column.attributes.has_template_bounds()
            || !column.id.to_lowercase().contains(&self.pattern)
        {
            return None;
        }

        let template_name = column.attributes.ui_name().unwrap_or_default();
        let produced = ctx
            .goals
            .iter()
            .map(|goal| {
                let goal_id = goal.id.to_string();
                let mut c = column.clone();
                c.id = column.id.replacen(&self.placeholder, &goal_id, 1);
                c.attributes.set_ui_name(format!(
                    "{} ({})",
                    goal.name,
                    template_name.replacen(&self.placeholder, &goal_id, 1)
                ));
                c
            })
            .collect();
        Some(produced)
    }
}

/// Expands any remaining template across its index bounds.
struct TemplateRangeRule {
    placeholder: String,
}

impl ExpansionRule for TemplateRangeRule {
    fn id(&self) -> &str {
        "template_range"
    }

    fn apply(&self, column: &Column, ctx: &ExpansionContext<'_>) -> Option<Vec<Column>> {
        let attrs = &column.attributes;
        if !attrs.has_template_bounds() {
            return None;
        }

        let bounds = if ctx.is_premium && attrs.has_premium_bounds() {
            attrs.premium_template_bounds()
        } else {
            attrs.template_bounds()
        };

        let Some((min, max)) = bounds else {
            tracing::debug!(column = %column.id, "template bounds do not parse; no columns produced");
            return Some(Vec::new());
        };

        let template_name = attrs.ui_name();
        let produced = (min..=max)
            .map(|i| {
                let index = i.to_string();
                let mut c = column.clone();
                c.id = column.id.replace(&self.placeholder, &index);
                if let Some(name) = template_name {
                    c.attributes.set_ui_name(name.replace(&self.placeholder, &index));
                }
                c
            })
            .collect();
        Some(produced)
    }
}
