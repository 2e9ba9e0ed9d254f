use proptest::prelude::*;
use std::path::PathBuf;
use vrc_archiver::batch::run_batch;
use vrc_archiver::error::ArchiverError;
use vrc_archiver::monthly::is_monthly_folder_name;
use vrc_archiver::transcode::{TargetFormat, TranscodeOptions};
use vrc_archiver::utils::format_file_size;
use vrc_archiver::ArchiveFormat;
use vrc_archiver::RunStatistics;

proptest! {
    #[test]
    fn transcode_options_quality_in_range(quality in 1u8..=100u8) {
        prop_assert!(TranscodeOptions::new(Some(quality), false).is_ok());
    }

    #[test]
    fn transcode_options_quality_out_of_range(quality in 0u8..=255u8) {
        let result = TranscodeOptions::new(Some(quality), false);
        if quality == 0 || quality > 100 {
            prop_assert!(result.is_err());
        } else {
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn target_format_extension_parses_back(format in prop_oneof![
        Just(TargetFormat::Jpeg),
        Just(TargetFormat::Png),
        Just(TargetFormat::WebP),
        Just(TargetFormat::Avif),
        Just(TargetFormat::Jxl),
    ]) {
        let parsed: TargetFormat = format.extension().parse().unwrap();
        prop_assert_eq!(parsed, format);
    }

    #[test]
    fn archive_format_rejects_unknown_tags(tag in "[a-z]{1,8}") {
        let parsed = tag.parse::<ArchiveFormat>();
        if tag == "7z" || tag == "zip" {
            prop_assert!(parsed.is_ok());
        } else {
            prop_assert!(parsed.is_err());
        }
    }

    #[test]
    fn compression_ratio_always_in_unit_interval(
        original in 1u64..=u64::MAX / 2,
        archive in 0u64..=u64::MAX / 2,
    ) {
        let stats = RunStatistics {
            total_original_size: original,
            ..Default::default()
        };
        let ratio = stats.compression_ratio(archive);
        prop_assert!((0.0..=1.0).contains(&ratio));
    }

    #[test]
    fn compression_ratio_zero_original_is_zero(archive in 0u64..=u64::MAX) {
        let stats = RunStatistics::default();
        prop_assert_eq!(stats.compression_ratio(archive), 0.0);
    }

    #[test]
    fn monthly_folder_name_matches_exact_pattern(year in 0u32..=9999, month in 0u32..=99) {
        let name = format!("{:04}-{:02}", year, month);
        prop_assert!(is_monthly_folder_name(&name));
    }

    #[test]
    fn monthly_folder_name_rejects_arbitrary_strings(name in "\\PC{0,12}") {
        let bytes = name.as_bytes();
        let expected = bytes.len() == 7
            && bytes[..4].iter().all(|b| b.is_ascii_digit())
            && bytes[4] == b'-'
            && bytes[5..].iter().all(|b| b.is_ascii_digit());
        prop_assert_eq!(is_monthly_folder_name(&name), expected);
    }

    #[test]
    fn format_file_size_is_never_empty(bytes in 0u64..=u64::MAX) {
        let formatted = format_file_size(bytes);
        prop_assert!(!formatted.is_empty());
        prop_assert!(formatted.contains('B'));
    }

    #[test]
    fn batch_outcome_partitions_seen_items(failures in proptest::collection::vec(any::<bool>(), 0..64)) {
        let items: Vec<PathBuf> = (0..failures.len())
            .map(|i| PathBuf::from(format!("file_{}.png", i)))
            .collect();
        let mut index = 0usize;
        let outcome = run_batch(
            &items,
            |_| {
                let fail = failures[index];
                index += 1;
                if fail {
                    Err(ArchiverError::NoFilesResolved)
                } else {
                    Ok(())
                }
            },
            None::<fn(usize, usize, &str)>,
        );

        let expected_errors = failures.iter().filter(|&&f| f).count();
        prop_assert_eq!(outcome.total, failures.len());
        prop_assert_eq!(outcome.errors, expected_errors);
        prop_assert_eq!(outcome.processed + outcome.errors, outcome.total);
    }
}
