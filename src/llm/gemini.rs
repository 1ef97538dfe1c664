use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default API root; overridable through `GEMINI_BASE_URL` for tests.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for answer synthesis.
pub const MODEL: &str = "gemini-1.5-flash";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Send a single-turn prompt to Gemini and return the first candidate's
/// text. Any transport or API failure propagates to the caller. The key is
/// sent as a header, not a query parameter, so error chains that display
/// the request URL never carry it.
pub async fn generate(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    prompt: &str,
) -> Result<String> {
    let url = format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        MODEL
    );

    let req = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
    };

    let resp = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .json(&req)
        .send()
        .await
        .context("Failed to call Gemini generate API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Gemini API returned {status}: {body}");
    }

    let body: GenerateResponse = resp
        .json()
        .await
        .context("Failed to parse Gemini response")?;

    let text: String = body
        .candidates
        .first()
        .map(|c| {
            c.content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        anyhow::bail!("Gemini returned no candidates");
    }
    Ok(text)
}
