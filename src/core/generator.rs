//! Prompt-driven generation workflows
//!
//! Each workflow owns one fixed prompt template. A request renders the
//! template with the caller's JSON, sends it to the completion provider and
//! wraps the outcome in a result record.

use crate::core::provider::{CompletionProvider, TokenUsage};
use crate::models::OperationResult;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Placeholder substituted with the caller's data
const CLIENT_INFO_PLACEHOLDER: &str = "{client_info}";

const BRANDING_PROMPT: &str = "You are a branding expert helping create a comprehensive brand identity.

Based on the client information provided, create:
1. Brand positioning statement
2. Target audience definition
3. Brand personality (3-5 traits)
4. Color palette suggestions (primary, secondary, accent colors)
5. Typography recommendations
6. Key messaging points

Client Info:
{client_info}

Return your response as a structured JSON object.";

const WEBSITE_PROMPT: &str = "You are a website design strategist creating a website plan.

Based on the client information and branding, create:
1. Sitemap (main pages and structure)
2. Homepage layout description
3. Key page descriptions
4. Call-to-action strategy
5. User journey map

Client Info:
{client_info}

Return your response as a structured JSON object.";

const SOCIAL_PROMPT: &str = "You are a social media strategist creating a content plan.

Based on the client information and branding, create:
1. Platform recommendations (which social media platforms and why)
2. Content pillars (3-5 main themes)
3. Posting frequency recommendations
4. Sample post ideas (5 examples)
5. Hashtag strategy

Client Info:
{client_info}

Return your response as a structured JSON object.";

const COPYWRITING_PROMPT: &str = "You are a professional copywriter creating marketing copy.

Based on the client information and branding, create:
1. Tagline options (3-5 variations)
2. About section copy
3. Value proposition statement
4. Service/Product descriptions
5. Email welcome sequence outline

Client Info:
{client_info}

Return your response as a structured JSON object.";

/// The generation workflows exposed over HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Branding,
    Website,
    Social,
    Copywriting,
}

impl Workflow {
    pub const ALL: [Workflow; 4] = [
        Workflow::Branding,
        Workflow::Website,
        Workflow::Social,
        Workflow::Copywriting,
    ];

    /// Route path serving this workflow
    pub fn path(self) -> &'static str {
        match self {
            Workflow::Branding => "/branding",
            Workflow::Website => "/website",
            Workflow::Social => "/social",
            Workflow::Copywriting => "/copywriting",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Workflow::Branding => BRANDING_PROMPT,
            Workflow::Website => WEBSITE_PROMPT,
            Workflow::Social => SOCIAL_PROMPT,
            Workflow::Copywriting => COPYWRITING_PROMPT,
        }
    }

    /// Fill the template with the caller's data, pretty-printed as JSON
    pub fn render(self, client_data: &Value) -> String {
        let client_info =
            serde_json::to_string_pretty(client_data).unwrap_or_else(|_| client_data.to_string());
        self.template()
            .replace(CLIENT_INFO_PLACEHOLDER, &client_info)
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Workflow::Branding => "branding",
            Workflow::Website => "website",
            Workflow::Social => "social",
            Workflow::Copywriting => "copywriting",
        };
        f.write_str(name)
    }
}

/// Payload of a successful generation
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    pub response: String,
    pub usage: TokenUsage,
}

/// Render the workflow prompt, call the provider and build the result record
///
/// Provider failures become `{success: false, error}`; nothing propagates.
pub async fn generate(
    provider: &dyn CompletionProvider,
    workflow: Workflow,
    client_data: &Value,
) -> OperationResult<Generation> {
    let prompt = workflow.render(client_data);

    let result = provider
        .complete(&prompt)
        .await
        .map(|completion| Generation {
            response: completion.text,
            usage: completion.usage,
        });

    OperationResult::from_result(&format!("{} generation", workflow), result)
}
