#[cfg(test)]
mod tests {

    mod thumbnail_size_tests {
        use crate::models::ThumbnailSize;

        #[test]
        fn test_parse_valid_sizes() {
            assert_eq!("small".parse(), Ok(ThumbnailSize::Small));
            assert_eq!("medium".parse(), Ok(ThumbnailSize::Medium));
            assert_eq!("large".parse(), Ok(ThumbnailSize::Large));
            assert_eq!("LARGE".parse(), Ok(ThumbnailSize::Large));
        }

        #[test]
        fn test_parse_invalid_size() {
            assert!("huge".parse::<ThumbnailSize>().is_err());
            assert!("".parse::<ThumbnailSize>().is_err());
        }

        #[test]
        fn test_pixel_boxes() {
            assert_eq!(ThumbnailSize::Small.px(), 200);
            assert_eq!(ThumbnailSize::Medium.px(), 400);
            assert_eq!(ThumbnailSize::Large.px(), 800);
        }

        #[test]
        fn test_display_round_trips() {
            for size in ThumbnailSize::ALL {
                assert_eq!(size.to_string().parse(), Ok(size));
            }
        }

        #[test]
        fn test_default_is_small() {
            assert_eq!(ThumbnailSize::default(), ThumbnailSize::Small);
        }
    }

    mod thumbnail_format_tests {
        use crate::models::ThumbnailFormat;

        #[test]
        fn test_parse_valid_formats() {
            assert_eq!("webp".parse(), Ok(ThumbnailFormat::Webp));
            assert_eq!("jpeg".parse(), Ok(ThumbnailFormat::Jpeg));
            assert_eq!("jpg".parse(), Ok(ThumbnailFormat::Jpeg));
            assert_eq!("png".parse(), Ok(ThumbnailFormat::Png));
        }

        #[test]
        fn test_parse_invalid_format() {
            assert!("bmp".parse::<ThumbnailFormat>().is_err());
            assert!("tiff".parse::<ThumbnailFormat>().is_err());
        }

        #[test]
        fn test_content_types() {
            assert_eq!(ThumbnailFormat::Webp.content_type(), "image/webp");
            assert_eq!(ThumbnailFormat::Jpeg.content_type(), "image/jpeg");
            assert_eq!(ThumbnailFormat::Png.content_type(), "image/png");
        }
    }

    mod thumbnail_path_tests {
        use crate::models::ThumbnailSize;
        use crate::services::thumbnails::{original_download_url, Thumbnailer};

        #[test]
        fn test_object_path_layout() {
            let path = Thumbnailer::object_path("p1", "m1", ThumbnailSize::Small);
            assert_eq!(path, "p1/thumbnails/small/m1.webp");
        }

        #[test]
        fn test_object_path_is_deterministic() {
            let a = Thumbnailer::object_path("p1", "m1", ThumbnailSize::Large);
            let b = Thumbnailer::object_path("p1", "m1", ThumbnailSize::Large);
            assert_eq!(a, b);
        }

        #[test]
        fn test_paths_differ_per_size() {
            let paths: Vec<String> = ThumbnailSize::ALL
                .iter()
                .map(|s| Thumbnailer::object_path("p1", "m1", *s))
                .collect();
            assert_eq!(paths.len(), 3);
            assert!(paths.iter().all(|p| p.ends_with("m1.webp")));
            assert_ne!(paths[0], paths[1]);
            assert_ne!(paths[1], paths[2]);
        }

        #[test]
        fn test_fallback_url() {
            assert_eq!(original_download_url("m1"), "/api/media/m1/download");
        }
    }

    mod image_tests {
        use crate::models::ThumbnailFormat;
        use crate::services::image::{cover_thumbnail, decode_image};
        use image::{DynamicImage, GenericImageView};

        fn sample_image(width: u32, height: u32) -> DynamicImage {
            DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
                width,
                height,
                image::Rgba([120, 80, 200, 255]),
            ))
        }

        fn sample_png(width: u32, height: u32) -> Vec<u8> {
            let mut buf = std::io::Cursor::new(Vec::new());
            sample_image(width, height)
                .write_to(&mut buf, image::ImageFormat::Png)
                .unwrap();
            buf.into_inner()
        }

        #[test]
        fn test_cover_thumbnail_fills_box() {
            let img = sample_image(64, 32);
            let (bytes, width, height) =
                cover_thumbnail(&img, 16, ThumbnailFormat::Webp, 80).unwrap();
            assert_eq!((width, height), (16, 16));
            // WebP container starts with a RIFF header.
            assert_eq!(&bytes[0..4], b"RIFF");
            assert_eq!(&bytes[8..12], b"WEBP");
        }

        #[test]
        fn test_cover_thumbnail_jpeg() {
            let img = sample_image(32, 32);
            let (bytes, _, _) = cover_thumbnail(&img, 16, ThumbnailFormat::Jpeg, 80).unwrap();
            assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        }

        #[test]
        fn test_cover_thumbnail_png() {
            let img = sample_image(32, 32);
            let (bytes, _, _) = cover_thumbnail(&img, 16, ThumbnailFormat::Png, 80).unwrap();
            assert_eq!(&bytes[1..4], b"PNG");
        }

        #[test]
        fn test_decode_round_trips_png() {
            let data = sample_png(8, 8);
            let img = decode_image(&data, "image/png").unwrap();
            assert_eq!(img.dimensions(), (8, 8));
        }

        #[test]
        fn test_decode_rejects_garbage() {
            assert!(decode_image(b"not an image", "image/png").is_err());
        }

        #[test]
        fn test_decode_rejects_unsupported_mime() {
            let data = sample_png(8, 8);
            let err = decode_image(&data, "image/tiff").unwrap_err();
            assert!(err.to_string().contains("Unsupported image format"));
        }
    }

    mod storage_tests {
        use crate::storage::{FsStore, ObjectStore, StorageError};
        use rand::Rng;

        fn temp_store() -> FsStore {
            let id: u32 = rand::thread_rng().gen();
            let root = std::env::temp_dir().join(format!("atelier_store_{}", id));
            FsStore::new(root, "/files").unwrap()
        }

        #[tokio::test]
        async fn test_upload_download_round() {
            let store = temp_store();
            store.upload("a/b/c.bin", b"hello", "application/octet-stream").await.unwrap();
            let bytes = store.download("a/b/c.bin").await.unwrap();
            assert_eq!(bytes, b"hello");
        }

        #[tokio::test]
        async fn test_upload_overwrites_in_place() {
            let store = temp_store();
            store.upload("x.bin", b"one", "application/octet-stream").await.unwrap();
            store.upload("x.bin", b"two", "application/octet-stream").await.unwrap();
            assert_eq!(store.download("x.bin").await.unwrap(), b"two");
        }

        #[tokio::test]
        async fn test_list_missing_prefix_is_empty() {
            let store = temp_store();
            assert!(store.list("nowhere/at/all").await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_list_reports_sizes() {
            let store = temp_store();
            store.upload("dir/a.bin", b"12345", "application/octet-stream").await.unwrap();
            let entries = store.list("dir").await.unwrap();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].name, "a.bin");
            assert_eq!(entries[0].size, 5);
        }

        #[tokio::test]
        async fn test_download_missing_is_not_found() {
            let store = temp_store();
            assert!(matches!(
                store.download("missing.bin").await,
                Err(StorageError::NotFound(_))
            ));
        }

        #[tokio::test]
        async fn test_traversal_is_rejected() {
            let store = temp_store();
            assert!(matches!(
                store.download("../etc/passwd").await,
                Err(StorageError::InvalidPath(_))
            ));
            assert!(matches!(
                store.upload("/abs/path", b"x", "text/plain").await,
                Err(StorageError::InvalidPath(_))
            ));
            assert!(matches!(
                store.list("").await,
                Err(StorageError::InvalidPath(_))
            ));
        }

        #[test]
        fn test_public_url_joins_base() {
            let store = temp_store();
            assert_eq!(store.public_url("p/t.webp"), "/files/p/t.webp");
        }
    }
}
