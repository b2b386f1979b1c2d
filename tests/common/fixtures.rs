//! Syllabus fixtures in the wire shape delivered by the content layer

use syllabus_dl::Course;

/// Course with a regular section and an exam section
///
/// - section 1: unit 10 (two videos, one text step), unit 11 (text only)
/// - section 2: exam, unit 20 (one video)
///
/// Videos offer "360" and "1080" renditions only.
pub const COURSE_JSON: &str = r#"{
  "id": 1,
  "section_ids": [1, 2],
  "sections": [
    {
      "id": 1,
      "unit_ids": [10, 11],
      "units": [
        {
          "id": 10,
          "lesson": {
            "id": 100,
            "step_ids": [1001, 1002, 1003],
            "steps": [
              {"id": 1001, "block": {"name": "video", "video": {"id": 501, "urls": [
                {"quality": "360", "url": "https://cdn.example.com/501/360.mp4"},
                {"quality": "1080", "url": "https://cdn.example.com/501/1080.mp4"}
              ]}}},
              {"id": 1002, "block": {"name": "text"}},
              {"id": 1003, "block": {"name": "video", "video": {"id": 502, "urls": [
                {"quality": "360", "url": "https://cdn.example.com/502/360.mp4"},
                {"quality": "1080", "url": "https://cdn.example.com/502/1080.mp4"}
              ]}}}
            ]
          }
        },
        {
          "id": 11,
          "lesson": {
            "id": 110,
            "step_ids": [1101],
            "steps": [{"id": 1101, "block": {"name": "text"}}]
          }
        }
      ]
    },
    {
      "id": 2,
      "unit_ids": [20],
      "is_exam": true,
      "units": [
        {
          "id": 20,
          "lesson": {
            "id": 200,
            "step_ids": [2001],
            "steps": [
              {"id": 2001, "block": {"name": "video", "video": {"id": 601, "urls": [
                {"quality": "720", "url": "https://cdn.example.com/601/720.mp4"}
              ]}}}
            ]
          }
        }
      ]
    }
  ]
}"#;

pub fn course() -> Course {
    serde_json::from_str(COURSE_JSON).expect("fixture course must parse")
}
