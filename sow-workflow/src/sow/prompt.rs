//! Composite prompt for the final document call

use crate::pricing::{PricingAdjustment, RateCard};
use crate::sow::types::SowRequest;
use crate::synthesis::{AdaptedContent, PersonalizationBundle};

/// Render the single prompt that asks for the full document
pub fn composite_prompt(
    request: &SowRequest,
    bundle: &PersonalizationBundle,
    adapted: &AdaptedContent,
    pricing: &PricingAdjustment,
    rate_card: &RateCard,
) -> Result<String, serde_json::Error> {
    let insights = serde_json::to_string_pretty(bundle)?;
    let adapted_json = serde_json::to_string_pretty(adapted)?;

    Ok(format!(
        "Create a highly personalized Statement of Work using this research data:

CLIENT: {client}
SERVICE: {service}
BRIEF: {brief}

PERSONALIZATION INSIGHTS:
{insights}

ADAPTED CONTENT:
{adapted_json}

Generate a comprehensive SOW with:
1. Personalized executive summary
2. Research-driven objectives ({objectives})
3. Custom deliverables ({deliverables})
4. Tailored scope items ({scope})
5. Realistic hour estimates for: {rates}

Suggested total budget: approximately {hours} hours ({justification})

Use these section headings: Executive Summary, Project Objectives, Scope of Work, Deliverables, Timeline, Investment, Terms, Next Steps.

Make it highly specific to {client} based on the research insights.",
        client = request.subject,
        service = request.service_label,
        brief = request.brief,
        objectives = adapted.objectives.join(", "),
        deliverables = adapted.deliverables.join(", "),
        scope = adapted.scope_items.join(", "),
        rates = rate_card.line_items(),
        hours = pricing.optimized_hours,
        justification = pricing.justification,
    ))
}
