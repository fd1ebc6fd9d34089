use crate::api::models::{Citation, SearchRequest, SearchResponse};
use crate::error::SearchError;
use crate::openai::{AnswerProvider, ProviderAnswer};

pub const INVALID_SITE: &str = "Invalid site URL";

/// Reduces user input like `" https://example.com "` to a bare domain.
/// Only one scheme prefix is removed.
pub fn normalize_site(raw: &str) -> String {
    let site = raw.trim();
    let site = site
        .strip_prefix("https://")
        .or_else(|| site.strip_prefix("http://"))
        .unwrap_or(site);
    site.trim().to_string()
}

/// `site:` filters for the domain (and its `www.` variant) followed by the question.
pub fn build_query(domain: &str, question: &str) -> String {
    let mut variants = vec![format!("site:{domain}")];
    if !domain.starts_with("www.") {
        variants.push(format!("site:www.{domain}"));
    }
    format!("{} {}", variants.join(" OR "), question.trim())
}

pub fn no_information_sentence(domain: &str) -> String {
    format!("No information found on {domain}.")
}

pub fn build_instructions(domain: &str) -> String {
    format!(
        "You are a helpful assistant. You must base your answer only on pages \
         from the domain '{domain}'. If you cannot find relevant information \
         there, reply exactly: '{}'",
        no_information_sentence(domain)
    )
}

pub fn shape_response(answer: ProviderAnswer) -> SearchResponse {
    let citations = answer
        .citations
        .filter(|c| !c.is_empty())
        .map(|raw| {
            raw.into_iter()
                .map(|c| Citation {
                    index: c.index,
                    url: c.url,
                })
                .collect()
        });

    SearchResponse {
        answer: answer.output_text,
        citations,
    }
}

pub async fn search(
    provider: &dyn AnswerProvider,
    request: SearchRequest,
) -> Result<SearchResponse, SearchError> {
    let domain = normalize_site(&request.site);
    if domain.is_empty() {
        return Err(SearchError::InvalidInput(INVALID_SITE.to_string()));
    }

    let query = build_query(&domain, &request.question);
    let instructions = build_instructions(&domain);

    let answer = provider
        .answer(&query, &instructions)
        .await
        .map_err(|e| SearchError::Upstream(e.to_string()))?;

    Ok(shape_response(answer))
}
