use std::path::Path;

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;

use crate::entities::image::{
    AcceptedImage, ImageCandidate, ImageKind, ImageNotice, MAX_IMAGE_BYTES,
};

const KEY_TOKEN_LENGTH: usize = 7;

/// Result of screening a batch of offered files.
#[derive(Debug, Default, PartialEq)]
pub struct Intake {
    pub accepted: Vec<AcceptedImage>,
    pub notices: Vec<ImageNotice>,
}

/// Screens offered files against type, size and remaining capacity.
///
/// Only the first `max - used` files are considered. Files past that point
/// are dropped with one aggregate notice; files inside it that fail
/// validation get one notice each.
pub fn screen_candidates(candidates: Vec<ImageCandidate>, used: usize, max: usize) -> Intake {
    let remaining = max.saturating_sub(used);
    let offered = candidates.len();
    let mut intake = Intake::default();

    for candidate in candidates.into_iter().take(remaining) {
        match validate_candidate(candidate) {
            Ok(image) => intake.accepted.push(image),
            Err(notice) => intake.notices.push(notice),
        }
    }

    if offered > remaining {
        intake.notices.push(ImageNotice::too_many(max, offered - remaining));
    }

    intake
}

/// Checks one file. The declared type must be allowed, the size must fit,
/// and the file's magic bytes must agree with an allowed encoding.
pub fn validate_candidate(candidate: ImageCandidate) -> Result<AcceptedImage, ImageNotice> {
    let declared = candidate
        .content_type
        .as_deref()
        .and_then(ImageKind::from_mime)
        .ok_or_else(|| ImageNotice::invalid_type(&candidate.file_name))?;

    if candidate.size > MAX_IMAGE_BYTES {
        return Err(ImageNotice::too_large(&candidate.file_name));
    }

    let sniffed = infer::get(&candidate.data)
        .and_then(|kind| ImageKind::from_mime(kind.mime_type()))
        .ok_or_else(|| ImageNotice::invalid_type(&candidate.file_name))?;

    if sniffed != declared {
        tracing::debug!(
            file_name = %candidate.file_name,
            declared = declared.mime_type(),
            sniffed = sniffed.mime_type(),
            "Declared image type differs from content"
        );
    }

    Ok(AcceptedImage {
        file_name: candidate.file_name,
        kind: sniffed,
        data: candidate.data,
    })
}

/// Builds `{owner}/{millis}-{token}.{ext}`.
pub fn object_key(owner_id: &Uuid, image: &AcceptedImage, now: DateTime<Utc>, token: &str) -> String {
    format!(
        "{}/{}-{}.{}",
        owner_id,
        now.timestamp_millis(),
        token,
        file_extension(&image.file_name).unwrap_or_else(|| image.kind.extension().to_string())
    )
}

pub fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_TOKEN_LENGTH)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
}

/// How an edit treats the images already stored for a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct EditPlan {
    /// Persisted URLs that stay, in their original order.
    pub kept: Vec<String>,
    /// Persisted URLs the owner asked to drop.
    pub removed: Vec<String>,
    /// Requested removals that are not images of this listing.
    pub ignored: Vec<String>,
}

impl EditPlan {
    pub fn new(persisted: &[String], removals: &[String]) -> Self {
        let (removed, kept): (Vec<String>, Vec<String>) = persisted
            .iter()
            .cloned()
            .partition(|url| removals.contains(url));

        let ignored = removals
            .iter()
            .filter(|url| !persisted.contains(url))
            .cloned()
            .collect();

        EditPlan { kept, removed, ignored }
    }

    /// Final URL list: kept images followed by the new uploads.
    pub fn final_images(&self, uploaded: impl IntoIterator<Item = String>) -> Vec<String> {
        self.kept.iter().cloned().chain(uploaded).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];
    const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00";

    fn png(name: &str) -> ImageCandidate {
        ImageCandidate::new(name, Some("image/png"), PNG.to_vec())
    }

    #[test]
    fn rejects_disallowed_type_but_keeps_valid_neighbour() {
        let gif = ImageCandidate::new("anim.gif", Some("image/gif"), GIF.to_vec());
        let intake = screen_candidates(vec![gif, png("room.png")], 0, 5);

        assert_eq!(intake.accepted.len(), 1);
        assert_eq!(intake.accepted[0].file_name, "room.png");
        assert_eq!(intake.notices, vec![ImageNotice::invalid_type("anim.gif")]);
    }

    #[test]
    fn rejects_oversized_file_with_its_own_reason() {
        let mut big = png("huge.png");
        big.size = MAX_IMAGE_BYTES + 1;
        let intake = screen_candidates(vec![big], 0, 5);

        assert!(intake.accepted.is_empty());
        assert_eq!(intake.notices, vec![ImageNotice::too_large("huge.png")]);
    }

    #[test]
    fn exactly_five_mebibytes_is_allowed() {
        let mut edge = png("edge.png");
        edge.size = MAX_IMAGE_BYTES;
        assert!(validate_candidate(edge).is_ok());
    }

    #[test]
    fn rejects_content_that_is_not_an_image() {
        let fake = ImageCandidate::new("script.png", Some("image/png"), b"#!/bin/sh\necho hi".to_vec());
        assert_eq!(validate_candidate(fake), Err(ImageNotice::invalid_type("script.png")));
    }

    #[test]
    fn sniffed_kind_wins_over_declared_kind() {
        let mislabeled = ImageCandidate::new("photo.png", Some("image/png"), JPEG.to_vec());
        assert_eq!(validate_candidate(mislabeled).unwrap().kind, ImageKind::Jpeg);
    }

    #[test]
    fn drops_overflow_with_single_notice() {
        let offered = (0..7).map(|i| png(&format!("{i}.png"))).collect();
        let intake = screen_candidates(offered, 0, 5);

        assert_eq!(intake.accepted.len(), 5);
        assert_eq!(intake.accepted[4].file_name, "4.png");
        assert_eq!(intake.notices, vec![ImageNotice::too_many(5, 2)]);
    }

    #[test]
    fn counts_images_already_in_use() {
        let offered = (0..3).map(|i| png(&format!("{i}.png"))).collect();
        let intake = screen_candidates(offered, 4, 5);

        assert_eq!(intake.accepted.len(), 1);
        assert_eq!(intake.notices, vec![ImageNotice::too_many(5, 2)]);
    }

    #[test]
    fn full_listing_accepts_nothing() {
        let intake = screen_candidates(vec![png("a.png")], 5, 5);
        assert!(intake.accepted.is_empty());
        assert_eq!(intake.notices.len(), 1);
    }

    #[test]
    fn key_is_namespaced_by_owner_and_keeps_extension() {
        let owner = Uuid::nil();
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let image = validate_candidate(png("Living Room.PNG")).unwrap();

        assert_eq!(
            object_key(&owner, &image, now, "ab12cd3"),
            "00000000-0000-0000-0000-000000000000/1700000000123-ab12cd3.png"
        );
    }

    #[test]
    fn key_falls_back_to_detected_extension() {
        let image = validate_candidate(ImageCandidate::new("blob", Some("image/jpeg"), JPEG.to_vec())).unwrap();
        let key = object_key(&Uuid::nil(), &image, Utc::now(), "zzzzzzz");
        assert!(key.ends_with("-zzzzzzz.jpg"));
    }

    #[test]
    fn random_tokens_are_short_and_vary() {
        let a = random_token();
        let b = random_token();
        assert_eq!(a.len(), KEY_TOKEN_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn edit_plan_keeps_order_and_appends_uploads() {
        let persisted = vec!["u1".to_string(), "u2".to_string(), "u3".to_string()];
        let plan = EditPlan::new(&persisted, &["u2".to_string(), "elsewhere".to_string()]);

        assert_eq!(plan.kept, vec!["u1", "u3"]);
        assert_eq!(plan.removed, vec!["u2"]);
        assert_eq!(plan.ignored, vec!["elsewhere"]);
        assert_eq!(
            plan.final_images(vec!["n1".to_string(), "n2".to_string()]),
            vec!["u1", "u3", "n1", "n2"]
        );
    }
}
