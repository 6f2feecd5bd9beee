use reqwest::{Client, Url};

use crate::{
    Error, Result,
    config::MalConfig,
    types::{AnimeListResponse, Season},
    utils,
};

use super::{decode_response, endpoint};

pub struct AnimeListClient {
    api_url: String,
    client: Client,
}

impl AnimeListClient {
    pub fn new(config: &MalConfig) -> Self {
        AnimeListClient {
            api_url: config.api_url.clone(),
            client: Client::new(),
        }
    }

    /// Retrieves the titles on the user's plan to watch list that start in
    /// `season`.
    ///
    /// Pages are requested one after another, following `paging.next` until
    /// the envelope no longer carries one. An entry is kept only when both
    /// the season name and the year of its `start_season` match; entries
    /// without a start season are dropped. Titles keep the order in which the
    /// server listed them across pages.
    ///
    /// # Errors
    ///
    /// Any failing page fails the whole call; titles from earlier pages are
    /// discarded.
    pub async fn fetch_plan_to_watch(&self, access_token: &str, season: &Season) -> Result<Vec<String>> {
        let first_page = Url::parse_with_params(
            &endpoint(&self.api_url, "users/@me/animelist"),
            &[("status", "plan_to_watch"), ("fields", "start_season")],
        )
        .map_err(|e| Error::Config(format!("invalid list url: {e}")))?;

        let pb = utils::spinner(&format!("Retrieving Plan To Watch List for {season}..."));

        let mut titles = Vec::new();
        let mut next = Some(first_page.to_string());
        let mut pages = 0;

        while let Some(url) = next {
            let page = match self.fetch_page(&url, access_token).await {
                Ok(page) => page,
                Err(e) => {
                    pb.finish_and_clear();
                    return Err(e);
                }
            };
            pages += 1;
            pb.set_message(format!("Retrieved {pages} page(s) of the Plan To Watch List..."));

            titles.extend(
                page.data
                    .into_iter()
                    .map(|n| n.node)
                    .filter(|entry| entry.aired_in(season))
                    .map(|entry| entry.title),
            );
            next = page.paging.next;
        }

        pb.finish_and_clear();
        Ok(titles)
    }

    async fn fetch_page(&self, url: &str, access_token: &str) -> Result<AnimeListResponse> {
        let response = self.client.get(url).bearer_auth(access_token).send().await?;
        decode_response(response).await
    }
}
