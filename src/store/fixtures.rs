//! Test fixtures shared by the unit tests of several modules

use super::types::{Generation, NamedRef, TextRef};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 3, 1, 12, 0, 0).unwrap()
}

/// A visible generation; higher `index` means newer
pub(crate) fn generation(index: usize) -> Generation {
    let created_at = base_time() + Duration::seconds(index as i64);
    Generation {
        id: format!("gen-{index:04}"),
        width: 512,
        height: 512,
        prompt: TextRef {
            id: format!("prompt-{index}"),
            text: format!("a watercolor fox, variation {index}"),
        },
        negative_prompt: (index % 2 == 0).then(|| TextRef {
            id: format!("neg-{index}"),
            text: "blurry".to_string(),
        }),
        model: NamedRef {
            id: "sd-1.5".to_string(),
            name: "Stable Diffusion 1.5".to_string(),
        },
        scheduler: NamedRef {
            id: "k-lms".to_string(),
            name: "K_LMS".to_string(),
        },
        seed: 1000 + index as i64,
        inference_steps: 30,
        guidance_scale: 7.0,
        image_id: format!("img-{index}"),
        created_at,
        updated_at: created_at,
        hidden: false,
    }
}

/// `count` visible generations, indices `0..count`
pub(crate) fn generations(count: usize) -> Vec<Generation> {
    (0..count).map(generation).collect()
}

/// A hidden generation
pub(crate) fn hidden_generation(index: usize) -> Generation {
    Generation {
        hidden: true,
        ..generation(index)
    }
}
