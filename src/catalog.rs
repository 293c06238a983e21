//! Voice catalog: grouping for the picker and default voice resolution.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::locale::{LanguageTag, LocaleResolver, FALLBACK_LOCALE};
use crate::model::{SelectedVoice, Voice, VoiceGroup};
use crate::preferences::VoicePreference;

/// Voices sharing a (language name, region name) pair.
struct Bucket {
    language: String,
    region: Option<String>,
    voices: Vec<Voice>,
}

/// Group raw platform voices by language and region.
///
/// Groups come out ordered by language name then region name, voices within a
/// group by name. A language spoken in several regions gets one group per
/// region labelled "Language (Region)"; otherwise the label is just the
/// language name. The result does not depend on the order of `voices`.
pub fn build_groups(voices: &[Voice], resolver: &dyn LocaleResolver) -> Vec<VoiceGroup> {
    let mut buckets: BTreeMap<(String, String), Bucket> = BTreeMap::new();

    for voice in voices {
        let language_name = resolver.language_name(&voice.language);
        let region_name = resolver.region_name(&voice.language).unwrap_or_default();

        buckets
            .entry((language_name, region_name))
            .or_insert_with(|| {
                let tag = LanguageTag::parse(&voice.language);
                Bucket {
                    language: tag
                        .as_ref()
                        .map(|t| t.language().to_string())
                        .unwrap_or_else(|| voice.language.to_ascii_lowercase()),
                    region: tag.and_then(|t| t.region().map(str::to_string)),
                    voices: Vec::new(),
                }
            })
            .voices
            .push(voice.clone());
    }

    let mut regions_per_language: BTreeMap<String, usize> = BTreeMap::new();
    for (language_name, _) in buckets.keys() {
        *regions_per_language.entry(language_name.clone()).or_default() += 1;
    }

    let groups: Vec<VoiceGroup> = buckets
        .into_iter()
        .map(|((language_name, region_name), mut bucket)| {
            bucket.voices.sort_by(|a, b| {
                a.name
                    .cmp(&b.name)
                    .then_with(|| a.id.cmp(&b.id))
                    .then_with(|| a.language.cmp(&b.language))
            });

            let several_regions = regions_per_language
                .get(&language_name)
                .is_some_and(|&count| count > 1);
            let label = if several_regions && !region_name.is_empty() {
                format!("{language_name} ({region_name})")
            } else {
                language_name
            };

            VoiceGroup {
                label,
                language: bucket.language,
                region: bucket.region,
                voices: bucket.voices,
            }
        })
        .collect();

    debug!(voices = voices.len(), groups = groups.len(), "Built voice catalog");
    groups
}

fn select(group: &VoiceGroup, voice: &Voice) -> SelectedVoice {
    SelectedVoice {
        voice: voice.clone(),
        group_label: group.label.clone(),
    }
}

/// Pick the voice to use at startup.
///
/// Priority:
/// 1. The saved voice (same language tag and id, or name for old records)
/// 2. Any voice with the saved language tag
/// 3. A voice for the system language and region, enhanced quality first
/// 4. A voice for the system language in any region, enhanced quality first
/// 5. The platform's default voice for the system language, then en-US
/// 6. The first voice of the first group
///
/// Returns `None` only when `groups` is empty and the platform has no default.
pub fn resolve_default_voice<F>(
    groups: &[VoiceGroup],
    saved: Option<&VoicePreference>,
    system_locale: &LanguageTag,
    resolver: &dyn LocaleResolver,
    platform_default: F,
) -> Option<SelectedVoice>
where
    F: Fn(&str) -> Option<Voice>,
{
    if let Some(saved) = saved {
        if let Some(found) = match_saved(groups, saved) {
            info!(voice_id = %found.voice.id, "Using saved voice");
            return Some(found);
        }
        debug!(voice = %saved.voice_name, lang = %saved.language, "Saved voice is no longer installed");
    }

    if let Some(found) = match_language_and_region(groups, system_locale) {
        info!(voice_id = %found.voice.id, locale = %system_locale, "Using voice for system locale");
        return Some(found);
    }

    if let Some(found) = match_language(groups, system_locale) {
        info!(voice_id = %found.voice.id, locale = %system_locale, "Using voice for system language");
        return Some(found);
    }

    let platform = platform_default(&system_locale.to_string())
        .or_else(|| platform_default(FALLBACK_LOCALE));
    if let Some(voice) = platform {
        info!(voice_id = %voice.id, "Using platform default voice");
        let group_label = groups
            .iter()
            .find(|g| g.voices.iter().any(|v| v.id == voice.id))
            .map(|g| g.label.clone())
            .unwrap_or_else(|| resolver.language_name(&voice.language));
        return Some(SelectedVoice { voice, group_label });
    }

    let first = groups
        .first()
        .and_then(|group| group.voices.first().map(|voice| select(group, voice)));
    if let Some(found) = &first {
        info!(voice_id = %found.voice.id, "Using first available voice");
    }
    first
}

fn match_saved(groups: &[VoiceGroup], saved: &VoicePreference) -> Option<SelectedVoice> {
    let mut same_language = None;

    for group in groups {
        for voice in &group.voices {
            if saved.matches(voice) {
                return Some(select(group, voice));
            }
            // Not the right voice, but the right language; keep looking for
            // the exact one
            if same_language.is_none() && voice.language == saved.language {
                same_language = Some(select(group, voice));
            }
        }
    }

    same_language
}

fn preferred_in(group: &VoiceGroup) -> Option<SelectedVoice> {
    group
        .first_high_fidelity()
        .or_else(|| group.voices.first())
        .map(|voice| select(group, voice))
}

fn match_language_and_region(groups: &[VoiceGroup], locale: &LanguageTag) -> Option<SelectedVoice> {
    groups
        .iter()
        .find(|g| g.language == locale.language() && g.region.as_deref() == locale.region())
        .and_then(preferred_in)
}

fn match_language(groups: &[VoiceGroup], locale: &LanguageTag) -> Option<SelectedVoice> {
    let mut same_language = groups.iter().filter(|g| g.language == locale.language());

    let first = same_language.clone().next()?;
    same_language
        .find_map(|group| group.first_high_fidelity().map(|voice| select(group, voice)))
        .or_else(|| first.voices.first().map(|voice| select(first, voice)))
}
