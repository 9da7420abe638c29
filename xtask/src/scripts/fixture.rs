use crate::cli;
use color_eyre::eyre::Result;
use serde_json::json;

/// Write a small two-page document in the structured-text JSON format.
///
/// Page 1 is vertical Japanese body text with a ruby gloss and a caption
/// below the body size, so it exercises the size cut, vertical crops, and
/// gloss filtering. Page 2 is plain horizontal text.
pub fn write(args: &cli::FixtureArgs) -> Result<()> {
    let document = json!({
        "pages": [
            {
                "width": 420.0,
                "height": 595.0,
                "blocks": [
                    {
                        "type": 0,
                        "bbox": [300.0, 40.0, 340.0, 560.0],
                        "lines": [
                            {
                                "bbox": [322.0, 40.0, 340.0, 560.0],
                                "spans": [
                                    {
                                        "text": "春はあけぼの。やうやう白くなりゆく山際",
                                        "size": 10.2,
                                        "bbox": [322.0, 40.0, 340.0, 560.0]
                                    }
                                ]
                            },
                            {
                                "bbox": [316.0, 300.0, 321.0, 400.0],
                                "spans": [
                                    {
                                        "text": "やまぎは",
                                        "size": 5.1,
                                        "bbox": [316.0, 300.0, 321.0, 400.0]
                                    }
                                ]
                            },
                            {
                                "bbox": [300.0, 40.0, 318.0, 560.0],
                                "spans": [
                                    {
                                        "text": "すこしあかりて、紫だちたる雲のほそくたなびきたる",
                                        "size": 10.2,
                                        "bbox": [300.0, 40.0, 318.0, 560.0]
                                    }
                                ]
                            }
                        ]
                    },
                    {
                        "type": 0,
                        "bbox": [60.0, 570.0, 200.0, 580.0],
                        "lines": [
                            {
                                "bbox": [60.0, 570.0, 200.0, 580.0],
                                "spans": [
                                    {
                                        "text": "枕草子 第一段",
                                        "size": 6.0,
                                        "bbox": [60.0, 570.0, 200.0, 580.0]
                                    }
                                ]
                            }
                        ]
                    }
                ]
            },
            {
                "width": 595.0,
                "height": 420.0,
                "blocks": [
                    {
                        "type": 0,
                        "bbox": [40.0, 60.0, 555.0, 120.0],
                        "lines": [
                            {
                                "bbox": [40.0, 60.0, 555.0, 84.0],
                                "spans": [
                                    {
                                        "text": "In spring it is the dawn that is most beautiful.",
                                        "size": 11.0,
                                        "bbox": [40.0, 60.0, 555.0, 84.0]
                                    }
                                ]
                            },
                            {
                                "bbox": [40.0, 90.0, 555.0, 114.0],
                                "spans": [
                                    {
                                        "text": "As the light creeps over the hills, their outlines are dyed a faint red.",
                                        "size": 11.0,
                                        "bbox": [40.0, 90.0, 555.0, 114.0]
                                    }
                                ]
                            }
                        ]
                    }
                ]
            }
        ]
    });

    std::fs::write(&args.output, serde_json::to_string_pretty(&document)?)?;
    println!("✓ Wrote fixture to {}", args.output);

    Ok(())
}
