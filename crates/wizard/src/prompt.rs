//! Prompt building.
//!
//! A template is plain text with `{field_key}` slots. Rendering substitutes
//! each slot with the field's value, or the empty string if it was never
//! entered. Anything in braces that is not a field key is left as written.

use planforge_core::{FieldKey, FieldMap};

pub const DEFAULT_TEMPLATE: &str = "\
You are an expert business consultant. Generate a comprehensive business plan based on the following information:

COMPANY OVERVIEW:
- Company Name: {company_name}
- Business Description: {business_description}
- Mission Statement: {mission}
- Target Market: {target_market}

MARKETING DETAILS:
- Marketing Strategy: {marketing_strategy}
- Customer Acquisition: {customer_acquisition}
- Marketing Channels: {marketing_channels}
- Budget Considerations: {budget_considerations}

COMPETITOR INFORMATION:
- Competitor Overview: {competitor_overview}
- Competitive Advantages: {competitive_advantages}
- Market Positioning: {market_positioning}
- Unique Value Proposition: {unique_value_prop}

FINANCIAL OVERVIEW:
- Expected Costs: {expected_costs}
- Financial Strategy: {financial_strategy}
- Projected Sales: {projected_sales}
- Revenue Model: {revenue_model}
- Funding Requirements: {funding_requirements}

Please generate a professional business plan with the following structure:
1. Executive Summary
2. Company Description
3. Market Analysis
4. Organization & Management
5. Service or Product Line
6. Marketing & Sales Strategy
7. Financial Projections
8. Funding Request (if applicable)
9. Appendix

Make the plan detailed, professional, and actionable. Use clear headings and bullet points for easy reading.
";

/// A prompt template with `{field_key}` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Fill every slot from `fields`. Never fails.
    pub fn render(&self, fields: &FieldMap) -> String {
        let mut out = String::with_capacity(self.template.len() + 1024);
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}').map(|close| (close, after[..close].parse::<FieldKey>())) {
                Some((close, Ok(key))) => {
                    out.push_str(fields.get(key));
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }

    /// Field keys with a slot in this template, in template order.
    pub fn slots(&self) -> Vec<FieldKey> {
        let mut found = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    if let Ok(key) = after[..close].parse::<FieldKey>() {
                        if !found.contains(&key) {
                            found.push(key);
                        }
                    }
                    rest = &after[close + 1..];
                }
                None => break,
            }
        }
        found
    }

    /// Field keys the template never asks for.
    pub fn unused_fields(&self) -> Vec<FieldKey> {
        let slots = self.slots();
        FieldKey::ALL
            .into_iter()
            .filter(|key| !slots.contains(key))
            .collect()
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

/// Render the default template.
pub fn build_prompt(fields: &FieldMap) -> String {
    PromptTemplate::default().render(fields)
}
