use crate::roadmap::{RoadmapRequest, SkillLevel, ROADMAP_DAYS};

const RESPONSE_SCHEMA: &str = r#"{
  "roadmap": [
    {
      "day": 1,
      "focus_topic": "Topic name",
      "daily_goal": "What to achieve today",
      "problems": [
        {
          "title": "Problem name",
          "difficulty": "Easy/Medium/Hard",
          "key_concept": "Main concept to learn",
          "approach_hint": "High-level approach, no code"
        }
      ],
      "study_resources": [
        "Resource: short description"
      ]
    }
  ],
  "overall_strategy": "Short overview of the whole plan",
  "success_metrics": "How to measure progress"
}"#;

pub fn build_roadmap_prompt(request: &RoadmapRequest, level: SkillLevel) -> String {
    let topics = request.weak_topics.join(", ");

    format!(
        "You are an experienced competitive programming mentor preparing a student for LeetCode-style interviews.\n\
         \n\
         Student profile:\n\
         - Skill level: {level}\n\
         - Problems solved so far: {total_solved}\n\
         - Weak topics: {topics}\n\
         \n\
         Build a {days}-day study roadmap that strengthens the weak topics.\n\
         \n\
         Rules:\n\
         1. Produce exactly {days} entries in \"roadmap\", one per day, with \"day\" numbered 1 to {days} in order.\n\
         2. Recommend 2-3 concrete problems per day and name the concept each one trains.\n\
         3. Ramp difficulty gradually, matched to a {level} student.\n\
         4. Give a daily goal and a few study resources for every day.\n\
         5. Never reveal full problem solutions or code. Hints must stay at the level of approach.\n\
         \n\
         Respond with JSON in exactly this shape:\n\
         {schema}\n\
         \n\
         Return only the JSON object. Do not add prose or markdown fences.",
        level = level,
        total_solved = request.total_solved,
        topics = topics,
        days = ROADMAP_DAYS,
        schema = RESPONSE_SCHEMA,
    )
}
