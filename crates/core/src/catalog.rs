//! Course and lesson catalog.
//!
//! The catalog ships as static sample data. Lesson ids are scoped to their
//! course, matching the `/courses/{slug}/lesson/{id}` URLs.

use std::sync::LazyLock;

use serde::Serialize;

use crate::types::{CourseId, LessonId, LevelId};

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub id: CourseId,
    pub slug: String,
    pub title: String,
    pub description: String,
    /// Level required to open the course.
    pub level: LevelId,
    pub thumbnail: String,
    pub lessons_count: u32,
    /// Human readable, e.g. "2 hours".
    pub duration: String,
}

/// A lesson belonging to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lesson {
    pub id: LessonId,
    pub course_id: CourseId,
    pub title: String,
    pub duration: String,
    /// Markdown body.
    pub content: String,
}

impl Lesson {
    /// Length in minutes, read from a duration like "25 min". Other formats
    /// count as zero.
    #[must_use]
    pub fn minutes(&self) -> u32 {
        let mut parts = self.duration.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some(n), Some(unit)) if unit.starts_with("min") => n.parse().unwrap_or(0),
            _ => 0,
        }
    }
}

/// Where a lesson sits inside its course.
#[derive(Debug, Clone, Copy)]
pub struct LessonPosition<'a> {
    /// 1-based position.
    pub number: usize,
    pub total: usize,
    pub lesson: &'a Lesson,
    pub previous: Option<&'a Lesson>,
    pub next: Option<&'a Lesson>,
}

/// Filters applied to a course listing.
#[derive(Debug, Clone, Default)]
pub struct CourseQuery {
    /// Only courses at exactly this level.
    pub level: Option<LevelId>,
    /// Case-insensitive match on title or description.
    pub search: String,
}

impl CourseQuery {
    #[must_use]
    pub fn matches(&self, course: &Course) -> bool {
        let level_ok = self.level.is_none_or(|level| course.level == level);
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || course.title.to_lowercase().contains(&needle)
            || course.description.to_lowercase().contains(&needle);
        level_ok && search_ok
    }
}

/// Derive a URL slug from a title: lowercase, whitespace runs become `-`.
///
/// ```
/// use atribot_core::catalog::slugify;
///
/// assert_eq!(slugify("Motors in  Motion"), "motors-in-motion");
/// ```
#[must_use]
pub fn slugify(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

static COURSES: LazyLock<Vec<Course>> = LazyLock::new(|| {
    let lessons = sample_lessons();
    let entries = [
        (
            1,
            "hello-robot",
            "Hello Robot: Your First Circuit",
            "Meet your kit, wire a battery to an LED and watch your robot's eyes light up.",
            LevelId::Level1,
            "2 hours",
        ),
        (
            2,
            "blinky-lights-and-buzzers",
            "Blinky Lights & Buzzers",
            "Make patterns with LEDs and play your first tune with a buzzer.",
            LevelId::Level1,
            "1.5 hours",
        ),
        (
            3,
            "motors-in-motion",
            "Motors in Motion",
            "Connect DC motors and wheels to build a robot that drives across the floor.",
            LevelId::Level2,
            "3 hours",
        ),
        (
            4,
            "gear-up",
            "Gear Up: Mechanical Basics",
            "Learn how gears trade speed for strength and build a robotic arm.",
            LevelId::Level2,
            "2.5 hours",
        ),
        (
            5,
            "sensing-the-world",
            "Sensing the World",
            "Use light, sound and distance sensors so your robot reacts to its surroundings.",
            LevelId::Level3,
            "3 hours",
        ),
        (
            6,
            "code-your-robot",
            "Code Your Robot",
            "Program a microcontroller with loops and conditions for autonomous driving.",
            LevelId::Level4,
            "4 hours",
        ),
        (
            7,
            "robot-challenge-arena",
            "Robot Challenge Arena",
            "Design, build and code a robot for line-following and obstacle challenges.",
            LevelId::Level5,
            "5 hours",
        ),
    ];

    entries
        .into_iter()
        .map(|(id, slug, title, description, level, duration)| {
            let id = CourseId::new(id);
            let lessons_count = lessons.iter().filter(|l| l.course_id == id).count();
            Course {
                id,
                slug: slug.to_owned(),
                title: title.to_owned(),
                description: description.to_owned(),
                level,
                thumbnail: format!("/static/images/courses/{slug}.svg"),
                lessons_count: u32::try_from(lessons_count).unwrap_or(u32::MAX),
                duration: duration.to_owned(),
            }
        })
        .collect()
});

static LESSONS: LazyLock<Vec<Lesson>> = LazyLock::new(|| {
    let entries: [(u32, u32, &str, &str, &str); 22] = [
        (1, 1, "Unboxing Your Kit", "10 min", "## What's in the box\n\nLay out every part on the table and match it to the parts card. You should find a battery pack, LEDs, jumper wires and your robot's body panels.\n\n- Check the battery pack switch is **off**\n- Keep small parts in the tray"),
        (1, 2, "What Is a Circuit?", "15 min", "## Electricity goes round\n\nA circuit is a loop. Electricity flows from the battery, through a part like an LED, and back to the battery. Break the loop and the flow stops."),
        (1, 3, "Light Up the Eyes", "20 min", "## Wiring the LEDs\n\n1. Push the long leg of each LED into the red rail\n2. Connect the short leg through a resistor to the black rail\n3. Switch the battery on\n\nYour robot can see!"),
        (1, 4, "Show and Tell", "10 min", "## Share your robot\n\nTake a photo of your glowing robot and tell someone how the circuit works."),
        (2, 1, "Blink!", "15 min", "## Making light flash\n\nUse the blink module to switch an LED on and off. Count how many blinks happen in ten seconds."),
        (2, 2, "Light Patterns", "20 min", "## Chasing lights\n\nWire three LEDs in a row and build a pattern that runs from left to right."),
        (2, 3, "Your First Tune", "20 min", "## Buzzers make sound\n\nA buzzer vibrates very fast to make a note. Press the buttons in order to play a short tune."),
        (3, 1, "Meet the Motor", "20 min", "## How motors spin\n\nA motor turns electricity into movement. Connect it to the battery and feel it spin."),
        (3, 2, "Wheels On", "25 min", "## Building the chassis\n\nAttach two wheels to the motors and a caster at the front."),
        (3, 3, "Forward and Back", "25 min", "## Changing direction\n\nSwap the motor wires to reverse. Use the switch board to drive forward and backward."),
        (4, 1, "Gears Explained", "20 min", "## Big gear, small gear\n\nWhen a small gear turns a big one, the big gear turns slower but with more strength."),
        (4, 2, "Build a Gearbox", "30 min", "## Stacking gears\n\nCombine three gears to slow the motor down and lift heavier things."),
        (4, 3, "Robotic Arm", "35 min", "## Grab and lift\n\nUse your gearbox to power a gripper arm that picks up a building block."),
        (5, 1, "Seeing Light", "20 min", "## Light sensors\n\nA light sensor measures how bright it is. Make your robot stop when the room goes dark."),
        (5, 2, "Hearing Sound", "20 min", "## Sound sensors\n\nClap your hands and make the robot turn around."),
        (5, 3, "Measuring Distance", "25 min", "## Ultrasonic sensor\n\nThe sensor sends out a sound too high to hear and listens for the echo. Stop before hitting the wall!"),
        (6, 1, "Hello, Microcontroller", "30 min", "## Uploading code\n\nConnect the board, open the editor and upload your first program."),
        (6, 2, "Loops and Conditions", "40 min", "## Making decisions\n\n```\nloop {\n    if distance < 10 {\n        turn_left();\n    } else {\n        forward();\n    }\n}\n```"),
        (6, 3, "Autonomous Driving", "45 min", "## Let it roam\n\nCombine sensors and code so your robot explores the room by itself."),
        (7, 1, "Line Following", "45 min", "## Follow the track\n\nUse two light sensors to keep the robot on a black line."),
        (7, 2, "Obstacle Course", "50 min", "## Dodge and weave\n\nPlan a route through the obstacle course and tune your turning speed."),
        (7, 3, "Competition Day", "60 min", "## Race!\n\nTime your runs, improve your design and compete with friends."),
    ];

    entries
        .into_iter()
        .map(|(course_id, id, title, duration, content)| Lesson {
            id: LessonId::new(id),
            course_id: CourseId::new(course_id),
            title: title.to_owned(),
            duration: duration.to_owned(),
            content: content.to_owned(),
        })
        .collect()
});

/// Every course in catalog order.
#[must_use]
pub fn sample_courses() -> &'static [Course] {
    &COURSES
}

/// Every lesson, grouped by course.
#[must_use]
pub fn sample_lessons() -> &'static [Lesson] {
    &LESSONS
}

/// Find a course by its slug.
#[must_use]
pub fn course_by_slug(slug: &str) -> Option<&'static Course> {
    sample_courses().iter().find(|c| c.slug == slug)
}

/// Lessons of `course`, in order.
#[must_use]
pub fn lessons_for(course: &Course) -> Vec<&'static Lesson> {
    sample_lessons()
        .iter()
        .filter(|l| l.course_id == course.id)
        .collect()
}

/// Locate `id` within `lessons` along with its neighbours.
#[must_use]
pub fn lesson_position<'a>(lessons: &[&'a Lesson], id: LessonId) -> Option<LessonPosition<'a>> {
    let index = lessons.iter().position(|l| l.id == id)?;
    let lesson = *lessons.get(index)?;
    Some(LessonPosition {
        number: index + 1,
        total: lessons.len(),
        lesson,
        previous: index.checked_sub(1).and_then(|i| lessons.get(i).copied()),
        next: lessons.get(index + 1).copied(),
    })
}
