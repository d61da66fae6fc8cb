use proptest::prelude::*;
use segset::annotation::ExportFormat;
use segset::export::{export_dataset, ExportOptions, ExportRequest, NoImages};

mod proptest_helpers;

fn formats() -> impl Strategy<Value = ExportFormat> {
    prop_oneof![Just(ExportFormat::Yolo), Just(ExportFormat::Coco)]
}

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn export_is_deterministic(
        (images, records) in proptest_helpers::arb_batch(4, 8, 12),
        format in formats(),
    ) {
        let classes = proptest_helpers::classes();
        let request = ExportRequest { annotations: &records, images: &images, classes: &classes };
        let options = ExportOptions::default();

        let first = export_dataset(&request, format, &options, &NoImages).expect("first export");
        let second = export_dataset(&request, format, &options, &NoImages).expect("second export");
        prop_assert_eq!(first.files(), second.files());

        // Input order must not matter either.
        let mut shuffled = records.clone();
        shuffled.reverse();
        let reversed = ExportRequest { annotations: &shuffled, images: &images, classes: &classes };
        let third = export_dataset(&reversed, format, &options, &NoImages).expect("reversed export");
        prop_assert_eq!(first.files(), third.files());
    }

    #[test]
    fn every_record_is_exported_or_counted_as_skipped(
        (images, records) in proptest_helpers::arb_batch(4, 8, 12),
        format in formats(),
    ) {
        let classes = proptest_helpers::classes();
        let request = ExportRequest { annotations: &records, images: &images, classes: &classes };
        let bundle = export_dataset(&request, format, &ExportOptions::default(), &NoImages)
            .expect("export");

        let manifest = bundle.manifest();
        let valid = records.iter().filter(|r| r.is_valid()).count();
        prop_assert_eq!(manifest.total_annotations, valid);
        prop_assert_eq!(manifest.skipped_invalid_annotations, records.len() - valid);
        prop_assert_eq!(bundle.exported_annotation_ids().len(), valid);
        prop_assert_eq!(manifest.total_images, images.len());
    }

    #[test]
    fn yolo_labels_hold_one_normalized_line_per_valid_record(
        (images, records) in proptest_helpers::arb_batch(4, 8, 12),
    ) {
        let classes = proptest_helpers::classes();
        let request = ExportRequest { annotations: &records, images: &images, classes: &classes };
        let bundle = export_dataset(&request, ExportFormat::Yolo, &ExportOptions::default(), &NoImages)
            .expect("export");

        let mut lines = 0;
        for (path, bytes) in bundle.files() {
            if !(path.starts_with("labels/") && path.ends_with(".txt")) {
                continue;
            }
            let text = std::str::from_utf8(bytes).expect("utf-8 label file");
            for line in text.lines() {
                lines += 1;
                let mut fields = line.split(' ');
                let class: u32 = fields.next().expect("class field").parse().expect("class index");
                prop_assert!(class < 3);

                let coords: Vec<f64> = fields.map(|f| f.parse().expect("coordinate")).collect();
                prop_assert!(coords.len() >= 6 && coords.len() % 2 == 0);
                prop_assert!(coords.iter().all(|c| (0.0..=1.0).contains(c)));
            }
        }
        prop_assert_eq!(lines, records.iter().filter(|r| r.is_valid()).count());
    }
}
