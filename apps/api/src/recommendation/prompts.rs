// Prompt fragments for the recommendation pipeline.
// The persona lives in llm_client::prompts; the output format is rendered from
// recommendation::format so the instructions and the parser share one source.

/// Section 1: role and task.
pub const RECOMMENDATION_PREAMBLE: &str = "You are a legal staffing assistant. \
Your task is to match client needs with available lawyers based on their expertise and background.";

pub const CLIENT_NEED_LABEL: &str = "Client Need:";

pub const ROSTER_HEADER: &str = "Available Lawyers and Their Expertise:";

pub const HEURISTICS_HEADER: &str = "Staffing guidance (use as hints; do not cite it):";

/// Rendered in the roster section when a field is missing.
pub const NOT_LISTED: &str = "Not listed";

pub const FORMAT_INTRO: &str = "Please analyze the lawyers' profiles and provide the best \
matches in a structured format suitable for creating a table. Format your response exactly \
like this example, maintaining the exact delimiter structure:";

/// Example values used in the format example, in `Field::ALL` order.
pub const FORMAT_EXAMPLE_VALUES: [&str; 5] = [
    "1",
    "John Smith",
    "Corporate Law, M&A",
    "Harvard Law School J.D.",
    "Extensive experience in corporate transactions with emphasis on technology sector",
];

/// Example client needs offered to users who don't know where to start.
pub const EXAMPLE_QUERIES: [&str; 4] = [
    "I need a lawyer experienced in intellectual property and software licensing",
    "Looking for someone who handles business startups and corporate governance",
    "Need help with technology transactions and SaaS agreements",
    "Who would be best for mergers and acquisitions in the technology sector?",
];
