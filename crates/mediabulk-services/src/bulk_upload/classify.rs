use mediabulk_core::models::{ClassifiedFile, TargetFieldSettings, UploadedFile};
use mediabulk_core::UploadError;

/// Match a file to the first content type whose target field accepts its
/// extension.
///
/// `candidates` yields `(content type id, target field settings)` in
/// configuration order.
pub fn classify<'a, I>(file: &UploadedFile, candidates: I) -> Result<ClassifiedFile, UploadError>
where
    I: IntoIterator<Item = (&'a str, &'a TargetFieldSettings)>,
{
    let info = file.info();
    let extension = info
        .normalized_extension()
        .ok_or_else(|| UploadError::InvalidFilename {
            filename: info.basename.clone(),
        })?;

    let content_type = candidates
        .into_iter()
        .find(|(_, settings)| settings.accepts(&extension))
        .map(|(id, _)| id.to_string())
        .ok_or_else(|| UploadError::UnsupportedExtension {
            filename: info.basename.clone(),
            extension: extension.clone(),
        })?;

    Ok(ClassifiedFile {
        file: file.clone(),
        info,
        extension,
        content_type,
    })
}

/// Check `size`, the byte length actually read for the file, against the
/// matched type's limit. A file exactly at the limit is accepted.
pub fn validate_size(
    file: &ClassifiedFile,
    size: u64,
    settings: &TargetFieldSettings,
    content_type_label: &str,
) -> Result<(), UploadError> {
    let max_bytes = settings
        .max_size_bytes()
        .map_err(|_| UploadError::InvalidSizeLimit {
            filename: file.info.basename.clone(),
            max_size: settings.max_filesize.clone(),
            content_type: content_type_label.to_string(),
        })?;

    if size > max_bytes {
        return Err(UploadError::ExceedsMaxSize {
            filename: file.info.basename.clone(),
            size,
            max_size: settings.max_filesize.clone(),
            content_type: content_type_label.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediabulk_core::models::FileFieldSettings;

    fn settings(extensions: &str, max: &str) -> TargetFieldSettings {
        TargetFieldSettings::from_field(
            "field_media",
            &FileFieldSettings {
                file_extensions: extensions.to_string(),
                max_filesize: max.to_string(),
                ..FileFieldSettings::default()
            },
            "32M",
        )
    }

    fn file(name: &str, size: u64) -> UploadedFile {
        UploadedFile::new(name, format!("/tmp/{}", name), size)
    }

    #[test]
    fn test_classify_single_match() {
        let image = settings("jpg png", "1M");
        let document = settings("pdf", "5M");
        let candidates = [("image", &image), ("document", &document)];

        let classified = classify(&file("report.PDF", 10), candidates).unwrap();
        assert_eq!(classified.content_type, "document");
        assert_eq!(classified.extension, "pdf");
        assert_eq!(classified.info.stem, "report");
    }

    #[test]
    fn test_classify_first_match_wins_on_overlap() {
        let a = settings("jpg png", "1M");
        let b = settings("png gif", "5M");

        let classified = classify(&file("x.png", 1), [("a", &a), ("b", &b)]).unwrap();
        assert_eq!(classified.content_type, "a");

        let classified = classify(&file("x.png", 1), [("b", &b), ("a", &a)]).unwrap();
        assert_eq!(classified.content_type, "b");

        let reordered = settings("gif png", "5M");
        let classified = classify(&file("x.png", 1), [("a", &a), ("b", &reordered)]).unwrap();
        assert_eq!(classified.content_type, "a");
    }

    #[test]
    fn test_classify_errors() {
        let image = settings("jpg png", "1M");
        let candidates = [("image", &image)];

        assert_eq!(
            classify(&file("clip.mkv", 1), candidates),
            Err(UploadError::UnsupportedExtension {
                filename: "clip.mkv".to_string(),
                extension: "mkv".to_string(),
            })
        );
        for name in ["README", ".png", "draft."] {
            assert!(matches!(
                classify(&file(name, 1), candidates),
                Err(UploadError::InvalidFilename { .. })
            ));
        }
    }

    #[test]
    fn test_validate_size_boundary() {
        let limit = settings("png", "1M");
        let at_limit = classify(&file("a.png", 1024 * 1024), [("image", &limit)]).unwrap();
        let over_limit = classify(&file("b.png", 1024 * 1024 + 1), [("image", &limit)]).unwrap();

        assert!(validate_size(&at_limit, 1024 * 1024, &limit, "Image").is_ok());
        assert_eq!(
            validate_size(&over_limit, 1024 * 1024 + 1, &limit, "Image"),
            Err(UploadError::ExceedsMaxSize {
                filename: "b.png".to_string(),
                size: 1024 * 1024 + 1,
                max_size: "1M".to_string(),
                content_type: "Image".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_size_ignores_declared_size() {
        let limit = settings("png", "1M");
        let classified = classify(&file("c.png", 10), [("image", &limit)]).unwrap();

        assert_eq!(
            validate_size(&classified, 3 * 1024 * 1024, &limit, "Image"),
            Err(UploadError::ExceedsMaxSize {
                filename: "c.png".to_string(),
                size: 3 * 1024 * 1024,
                max_size: "1M".to_string(),
                content_type: "Image".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_size_with_unparseable_limit() {
        let broken = settings("png", "lots");
        let classified = classify(&file("a.png", 1), [("image", &broken)]).unwrap();
        assert!(matches!(
            validate_size(&classified, 1, &broken, "Image"),
            Err(UploadError::InvalidSizeLimit { .. })
        ));
    }
}
