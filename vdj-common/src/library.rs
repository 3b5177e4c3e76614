//! Built-in starter library
//!
//! Three starter playlists and the registry of nine built-in sound
//! effects. The starter playlists double as the deterministic fallback
//! when vibe-driven playlist generation fails.

use crate::types::{GeneratedPlaylist, SoundEffect, Track};

/// The nine built-in sound effects known to the synthesis engine.
pub fn builtin_sound_effects() -> Vec<SoundEffect> {
    vec![
        SoundEffect::new("se1", "Air Horn", "📢"),
        SoundEffect::new("se2", "Record Scratch", "⏪"),
        SoundEffect::new("se3", "Crowd Cheer", "🎉"),
        SoundEffect::new("se4", "Laser", "⚡"),
        SoundEffect::new("se5", "Drop", "🔥"),
        SoundEffect::new("se6", "Hand Clap", "👏"),
        SoundEffect::new("se7", "Car Horn", "📣"),
        SoundEffect::new("se8", "Jet Take Off", "✈️"),
        SoundEffect::new("se9", "Whistle", "😗"),
    ]
}

/// Starter playlists used before (or instead of) generated ones.
pub fn starter_playlists() -> Vec<GeneratedPlaylist> {
    vec![
        GeneratedPlaylist::new(
            "Weekend Party Starters",
            vec![
                Track::new("Blinding Lights", "The Weeknd", 200),
                Track::new("Levitating", "Dua Lipa", 210),
                Track::new("As It Was", "Harry Styles", 167),
                Track::new("Good 4 U", "Olivia Rodrigo", 178),
                Track::new("Uptown Funk", "Mark Ronson ft. Bruno Mars", 270),
            ],
        ),
        GeneratedPlaylist::new(
            "Funky Grooves",
            vec![
                Track::new("Don't Start Now", "Dua Lipa", 183),
                Track::new("Crazy Little Thing Called Love", "Queen", 174),
                Track::new("Juice", "Lizzo", 195),
                Track::new("Bad Guy", "Billie Eilish", 194),
                Track::new("Get Lucky", "Daft Punk ft. Pharrell Williams", 248),
            ],
        ),
        GeneratedPlaylist::new(
            "Summer Vibes",
            vec![
                Track::new("Shape of You", "Ed Sheeran", 233),
                Track::new("Watermelon Sugar", "Harry Styles", 174),
                Track::new("Havana", "Camila Cabello ft. Young Thug", 217),
            ],
        ),
    ]
}
