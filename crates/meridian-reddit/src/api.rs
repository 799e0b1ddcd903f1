//! Reddit OAuth API access (client-credentials grant).

use serde::Deserialize;

use meridian_core::Post;

use crate::error::CollectorError;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    title: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: u64,
    url: Option<String>,
    permalink: Option<String>,
    #[serde(default)]
    promoted: Option<bool>,
}

/// Exchanges client credentials for a bearer token.
///
/// # Errors
///
/// Returns [`CollectorError::Auth`] on a non-2xx status or a body without a
/// token, and [`CollectorError::Http`] on transport failures.
pub(crate) async fn fetch_token(
    client: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    user_agent: &str,
) -> Result<String, CollectorError> {
    let response = client
        .post(token_url)
        .header("User-Agent", user_agent)
        .basic_auth(client_id, Some(client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(CollectorError::Auth(format!(
            "token exchange failed with status {}",
            response.status()
        )));
    }

    let body = response.text().await?;
    let token: TokenResponse =
        serde_json::from_str(&body).map_err(|source| CollectorError::Deserialize {
            context: "reddit access token".to_string(),
            source,
        })?;

    match (token.access_token, token.error) {
        (Some(t), _) if !t.is_empty() => Ok(t),
        (_, Some(err)) => Err(CollectorError::Auth(err)),
        _ => Err(CollectorError::Auth("response carried no access_token".to_string())),
    }
}

/// Fetches one subreddit's hot listing through the OAuth API.
///
/// # Errors
///
/// Returns [`CollectorError::RateLimited`] on 429, [`CollectorError::UnexpectedStatus`]
/// on other non-2xx statuses, and [`CollectorError::Deserialize`] for malformed JSON.
pub(crate) async fn fetch_hot(
    client: &reqwest::Client,
    oauth_base: &str,
    token: &str,
    user_agent: &str,
    subreddit: &str,
    limit: u32,
    link_base: &str,
) -> Result<Vec<Post>, CollectorError> {
    let url = format!("{oauth_base}/r/{subreddit}/hot");
    let response = client
        .get(&url)
        .bearer_auth(token)
        .header("User-Agent", user_agent)
        .query(&[("limit", limit.to_string())])
        .send()
        .await?;

    let status = response.status();
    if status.as_u16() == 429 {
        return Err(CollectorError::RateLimited {
            subreddit: subreddit.to_string(),
            retry_after_secs: retry_after(&response),
        });
    }
    if !status.is_success() {
        return Err(CollectorError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    let body = response.text().await?;
    let listing: Listing =
        serde_json::from_str(&body).map_err(|source| CollectorError::Deserialize {
            context: format!("r/{subreddit} hot listing"),
            source,
        })?;

    let posts = listing
        .data
        .children
        .into_iter()
        .map(|c| c.data)
        .filter(|d| d.promoted != Some(true))
        .filter_map(|d| to_post(d, subreddit, link_base))
        .take(limit as usize)
        .collect();
    Ok(posts)
}

fn to_post(data: PostData, subreddit: &str, link_base: &str) -> Option<Post> {
    let title = data.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;
    let permalink = data
        .permalink
        .map(|p| format!("{link_base}{p}"))
        .unwrap_or_default();
    let url = data.url.unwrap_or_else(|| permalink.clone());
    Some(Post {
        title,
        score: data.score,
        num_comments: data.num_comments,
        url,
        permalink,
        source: subreddit.to_string(),
    })
}

/// Reads `Retry-After` in seconds, defaulting to 60.
pub(crate) fn retry_after(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(60)
}
