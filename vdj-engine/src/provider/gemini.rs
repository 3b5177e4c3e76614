//! Gemini-backed DJ provider
//!
//! Talks to the Gemini `generateContent` REST API with structured JSON
//! output. Response shapes are small typed structs; anything malformed
//! becomes a provider error for the session to absorb with its local
//! fallbacks.

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use vdj_common::{library, GeneratedPlaylist, Track, TransitionResult};

use crate::error::{Error, Result};
use crate::provider::DjProvider;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini REST client implementing the provider interface.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

/// Top-level `generateContent` response envelope.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Structured transition payload requested from the model.
#[derive(Debug, Deserialize)]
struct TransitionPayload {
    commentary: String,
    transition_effect: String,
    #[serde(default)]
    sound_effect: Option<String>,
}

/// A bare song reference as the model returns it.
#[derive(Debug, Deserialize)]
struct SongRef {
    title: String,
    artist: String,
}

/// One generated playlist as the model returns it.
#[derive(Debug, Deserialize)]
struct PlaylistPayload {
    name: String,
    songs: Vec<SongRef>,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Run one generateContent call and return the first candidate's text.
    async fn generate(&self, prompt: &str, json_output: bool) -> Result<String> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        );

        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        if json_output {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "Gemini returned HTTP {}",
                response.status()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Invalid Gemini response: {}", e)))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .ok_or_else(|| Error::Provider("Gemini response had no candidates".to_string()))?;

        debug!("Gemini returned {} bytes of text", text.len());
        Ok(text)
    }

    /// Resolve a `{title, artist}` payload into a full track with a
    /// synthesized duration.
    fn track_from_ref(song: SongRef, duration_secs: u32) -> Track {
        Track::new(song.title, song.artist, duration_secs)
    }
}

#[async_trait]
impl DjProvider for GeminiProvider {
    async fn get_transition(&self, current: &Track, next: &Track) -> Result<TransitionResult> {
        let effect_names: Vec<String> = library::builtin_sound_effects()
            .into_iter()
            .map(|e| e.display_name)
            .collect();

        let prompt = format!(
            "You are a world-class party DJ named \"DJ Verchual\". You are creating a mix.\n\
             The current song, \"{}\" by {}, is ending.\n\
             The next song is \"{}\" by {}.\n\n\
             Your tasks:\n\
             1. Suggest a professional DJ transition technique (e.g., \"Beatmatch\", \"Crossfade\", \"Echo Out & Drop\", \"Hard Cut\").\n\
             2. Write a short, fun, and energetic commentary (1-2 sentences) to hype up the crowd for the next song.\n\
             3. Optionally, suggest ONE relevant sound effect to play during the transition from this list: [{}]. If no sound effect is needed, return null for that field.\n\n\
             Return your response as a JSON object with keys \"commentary\", \"transition_effect\", and \"sound_effect\".",
            current.title,
            current.artist,
            next.title,
            next.artist,
            effect_names.join(", ")
        );

        let text = self.generate(&prompt, true).await?;
        let payload: TransitionPayload = serde_json::from_str(&text)
            .map_err(|e| Error::Provider(format!("Bad transition payload: {}", e)))?;

        // Models sometimes hand back the literal string "null"
        let sound_effect = payload
            .sound_effect
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"));

        Ok(TransitionResult {
            commentary: payload.commentary,
            transition_style: payload.transition_effect,
            sound_effect,
        })
    }

    async fn get_suggestion(&self, seed: &Track, exclude: &[Track]) -> Result<Option<Track>> {
        let titles: Vec<&str> = exclude.iter().map(|t| t.title.as_str()).collect();
        let prompt = format!(
            "You are a party DJ's music suggestion assistant. The last song played was \"{}\" by {}. \
             Suggest a similar, high-energy party song that would fit well in the mix. \
             The current playlist already contains: {}. Provide a song that is NOT on this list. \
             Return a JSON object with keys \"title\" and \"artist\".",
            seed.title,
            seed.artist,
            titles.join(", ")
        );

        let text = self.generate(&prompt, true).await?;
        let song: SongRef = serde_json::from_str(&text)
            .map_err(|e| Error::Provider(format!("Bad suggestion payload: {}", e)))?;

        Ok(Some(Self::track_from_ref(song, 180)))
    }

    async fn get_requested_track(
        &self,
        request: &str,
        exclude: &[Track],
    ) -> Result<Option<Track>> {
        let titles: Vec<&str> = exclude.iter().map(|t| t.title.as_str()).collect();
        let prompt = format!(
            "You are a party DJ's music request assistant. A guest requested: \"{}\". \
             If this is a specific song and artist, return that. \
             If it's a vague request (like 'something funky' or 'a 90s hit'), pick a very popular \
             and well-known song that fits the description. \
             The current playlist already contains these songs: {}. Try not to repeat songs. \
             Return a JSON object with keys \"title\" and \"artist\".",
            request,
            titles.join(", ")
        );

        let text = self.generate(&prompt, true).await?;
        let song: SongRef = serde_json::from_str(&text)
            .map_err(|e| Error::Provider(format!("Bad request payload: {}", e)))?;

        Ok(Some(Self::track_from_ref(song, 180)))
    }

    async fn get_lyrics(&self, track: &Track) -> Result<String> {
        let prompt = format!(
            "You are a lyric-writing assistant.\n\
             Please generate plausible, creative, and family-friendly lyrics for the song \"{}\" by {}.\n\
             The lyrics should be structured like a real song (e.g., with verses and a chorus).\n\
             Format the output with line breaks for each line of the song. Do not include any other \
             text like \"Here are the lyrics:\" or markdown formatting.",
            track.title, track.artist
        );

        self.generate(&prompt, false).await
    }

    async fn generate_playlists(&self, vibe: &str) -> Result<Vec<GeneratedPlaylist>> {
        let prompt = format!(
            "You are a world-class DJ and music curator. A user wants to start a party and has \
             described the vibe as: \"{}\".\n\n\
             Your task is to generate 5 diverse but fitting playlist suggestions for this party.\n\
             For each playlist, provide a creative name and a list of 5 to 8 iconic songs (title \
             and artist) that perfectly match the playlist's theme and the overall party vibe.\n\n\
             Return your response as a JSON array of objects with keys \"name\" and \"songs\", \
             where \"songs\" is an array of objects with keys \"title\" and \"artist\".",
            vibe
        );

        let text = self.generate(&prompt, true).await?;
        let payloads: Vec<PlaylistPayload> = serde_json::from_str(&text)
            .map_err(|e| Error::Provider(format!("Bad playlist payload: {}", e)))?;

        if payloads.is_empty() {
            warn!("Gemini returned zero playlists for vibe '{}'", vibe);
        }

        let mut rng = rand::thread_rng();
        Ok(payloads
            .into_iter()
            .map(|p| {
                let tracks = p
                    .songs
                    .into_iter()
                    .map(|s| Self::track_from_ref(s, rng.gen_range(180..=240)))
                    .collect();
                GeneratedPlaylist::new(p.name, tracks)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_payload_null_effect() {
        let payload: TransitionPayload = serde_json::from_str(
            r#"{"commentary":"Here we go!","transition_effect":"Beatmatch","sound_effect":null}"#,
        )
        .unwrap();
        assert_eq!(payload.transition_effect, "Beatmatch");
        assert!(payload.sound_effect.is_none());
    }

    #[test]
    fn test_playlist_payload_shape() {
        let payloads: Vec<PlaylistPayload> = serde_json::from_str(
            r#"[{"name":"Retro Heat","songs":[{"title":"Le Freak","artist":"Chic"}]}]"#,
        )
        .unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].songs[0].artist, "Chic");
    }

    #[test]
    fn test_candidate_envelope_parses() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"  hello  "}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.candidates[0].content.parts[0].text, "  hello  ");
    }
}
