//! Static curriculum content. Grades in a band share one subject shape; strand content differs
//! per term.

use super::{Grade, Strand, SubStrand, Subject};
use crate::scoring::ScoringScheme;

struct SubjectShape {
    name: &'static str,
    scheme: ScoringScheme,
    terms: [&'static [StrandShape]; 3],
}

struct StrandShape {
    number: u32,
    theme: &'static str,
    sub_strands: &'static [(&'static str, &'static [&'static str])],
}

const DESCRIPTIVE: ScoringScheme = ScoringScheme::DescriptiveLevels;
const NUMERIC: ScoringScheme = ScoringScheme::NumericComposite;

const LOWER_PRIMARY_GRADES: [&str; 3] = ["Grade 1", "Grade 2", "Grade 3"];
const UPPER_PRIMARY_GRADES: [&str; 3] = ["Grade 4", "Grade 5", "Grade 6"];
const JUNIOR_SECONDARY_GRADES: [&str; 3] = ["Grade 7", "Grade 8", "Grade 9"];

pub(super) fn grades() -> Vec<Grade> {
    let mut out = Vec::new();
    out.extend(band(&LOWER_PRIMARY_GRADES, LOWER_PRIMARY));
    out.extend(band(&UPPER_PRIMARY_GRADES, UPPER_PRIMARY));
    out.extend(band(&JUNIOR_SECONDARY_GRADES, JUNIOR_SECONDARY));
    out
}

fn band(names: &[&str], shape: &[SubjectShape]) -> Vec<Grade> {
    names
        .iter()
        .map(|name| Grade {
            name: (*name).to_string(),
            terms: [term(shape, 0), term(shape, 1), term(shape, 2)],
        })
        .collect()
}

fn term(shape: &[SubjectShape], idx: usize) -> Vec<Subject> {
    shape
        .iter()
        .filter(|s| !s.terms[idx].is_empty())
        .map(|s| Subject {
            name: s.name.to_string(),
            scheme: s.scheme,
            strands: s.terms[idx].iter().map(strand).collect(),
        })
        .collect()
}

fn strand(shape: &StrandShape) -> Strand {
    Strand {
        number: shape.number,
        theme: shape.theme.to_string(),
        sub_strands: shape
            .sub_strands
            .iter()
            .map(|(name, details)| SubStrand {
                name: (*name).to_string(),
                details: details.iter().map(|d| (*d).to_string()).collect(),
            })
            .collect(),
    }
}

const LOWER_PRIMARY: &[SubjectShape] = &[
    SubjectShape {
        name: "Mathematics Activities",
        scheme: DESCRIPTIVE,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Numbers",
                    sub_strands: &[
                        ("Pre-number activities", &["Sorting", "Matching", "Ordering"]),
                        ("Whole numbers", &["Counting", "Reading numbers", "Place value"]),
                        ("Addition", &[]),
                    ],
                },
                StrandShape {
                    number: 2,
                    theme: "Measurement",
                    sub_strands: &[("Length", &[]), ("Mass", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Numbers",
                    sub_strands: &[("Subtraction", &[]), ("Multiplication", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Measurement",
                    sub_strands: &[("Capacity", &[]), ("Time", &["Days of the week", "Telling time"])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Numbers",
                    sub_strands: &[("Division", &[]), ("Fractions", &["Halves", "Quarters"])],
                },
                StrandShape {
                    number: 2,
                    theme: "Geometry",
                    sub_strands: &[("Lines", &[]), ("Shapes", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "English Language Activities",
        scheme: DESCRIPTIVE,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Listening and Speaking",
                    sub_strands: &[("Greetings", &[]), ("Polite language", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Reading",
                    sub_strands: &[("Book handling skills", &[]), ("Letter recognition", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Listening and Speaking",
                    sub_strands: &[("Pronunciation", &[]), ("Oral narratives", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Reading",
                    sub_strands: &[("Reading aloud", &[]), ("Comprehension", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Writing",
                    sub_strands: &[("Pre-writing", &[]), ("Handwriting", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Language Use",
                    sub_strands: &[("Naming words", &[]), ("Action words", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "Kiswahili Language Activities",
        scheme: DESCRIPTIVE,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Kusikiliza na Kuzungumza",
                    sub_strands: &[("Salamu", &[]), ("Maamkizi", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Kusoma",
                    sub_strands: &[("Herufi", &[]), ("Silabi", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Kusikiliza na Kuzungumza",
                    sub_strands: &[("Matamshi", &[]), ("Hadithi", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Kusoma",
                    sub_strands: &[("Kusoma kwa sauti", &[]), ("Ufahamu", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Kuandika",
                    sub_strands: &[("Mwandiko", &[]), ("Imla", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Sarufi",
                    sub_strands: &[("Nomino", &[]), ("Vitenzi", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "Environmental Activities",
        scheme: DESCRIPTIVE,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Social Environment",
                    sub_strands: &[("Myself", &[]), ("Family", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Natural Environment",
                    sub_strands: &[("Weather", &[]), ("Plants", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Social Environment",
                    sub_strands: &[("School", &[]), ("Safety", &["Road safety", "Safety at home"])],
                },
                StrandShape {
                    number: 2,
                    theme: "Natural Environment",
                    sub_strands: &[("Animals", &[]), ("Soil", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Social Environment",
                    sub_strands: &[("Neighbourhood", &[]), ("Community helpers", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Natural Environment",
                    sub_strands: &[("Water", &[]), ("Light and sound", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "Creative Activities",
        scheme: DESCRIPTIVE,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Movement",
                    sub_strands: &[("Locomotor skills", &[]), ("Non-locomotor skills", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Art",
                    sub_strands: &[("Drawing", &[]), ("Colouring", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Music",
                    sub_strands: &[("Singing games", &[]), ("Rhythm", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Art",
                    sub_strands: &[("Modelling", &[]), ("Weaving", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Movement",
                    sub_strands: &[("Ball handling", &[]), ("Swimming", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Music",
                    sub_strands: &[("Percussion instruments", &[]), ("Dance", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "Christian Religious Education",
        scheme: DESCRIPTIVE,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Creation",
                    sub_strands: &[("God the Creator", &[]), ("Myself", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "The Bible",
                    sub_strands: &[("Books of the Bible", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Jesus Christ",
                    sub_strands: &[("Birth of Jesus", &[]), ("Baptism", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "The Church",
                    sub_strands: &[("Prayer", &[]), ("Worship", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Christian Living",
                    sub_strands: &[("Love", &[]), ("Sharing", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "The Church",
                    sub_strands: &[("Christian festivals", &[])],
                },
            ],
        ],
    },
];

const UPPER_PRIMARY: &[SubjectShape] = &[
    SubjectShape {
        name: "Mathematics",
        scheme: NUMERIC,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Numbers",
                    sub_strands: &[
                        ("Whole numbers", &["Place value", "Rounding off"]),
                        ("Multiplication", &[]),
                        ("Division", &[]),
                    ],
                },
                StrandShape {
                    number: 2,
                    theme: "Measurement",
                    sub_strands: &[("Length", &[]), ("Area", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Numbers",
                    sub_strands: &[("Fractions", &[]), ("Decimals", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Measurement",
                    sub_strands: &[("Capacity", &[]), ("Mass", &[]), ("Time", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Geometry",
                    sub_strands: &[("Angles", &[]), ("3D objects", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Data Handling",
                    sub_strands: &[("Pictographs", &[]), ("Bar graphs", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "English",
        scheme: NUMERIC,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Listening and Speaking",
                    sub_strands: &[("Pronunciation and vocabulary", &[]), ("Oral instructions", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Reading",
                    sub_strands: &[("Intensive reading", &[]), ("Reading fluency", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Grammar in Use",
                    sub_strands: &[("Nouns", &[]), ("Pronouns", &[]), ("Verbs", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Writing",
                    sub_strands: &[("Guided writing", &[]), ("Composition", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Reading",
                    sub_strands: &[("Extensive reading", &[]), ("Comprehension", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Writing",
                    sub_strands: &[("Functional writing", &["Letters", "Notices"]), ("Creative writing", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "Kiswahili",
        scheme: NUMERIC,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Kusikiliza na Kuzungumza",
                    sub_strands: &[("Matamshi bora", &[]), ("Msamiati", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Kusoma",
                    sub_strands: &[("Kusoma kwa ufasaha", &[]), ("Ufahamu", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Sarufi",
                    sub_strands: &[("Ngeli", &[]), ("Nyakati", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Kuandika",
                    sub_strands: &[("Insha", &[]), ("Barua", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Kusoma",
                    sub_strands: &[("Kusoma kwa mapana", &[]), ("Fasihi simulizi", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Kuandika",
                    sub_strands: &[("Imla", &[]), ("Uandishi wa kiuamilifu", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "Science and Technology",
        scheme: NUMERIC,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Living Things",
                    sub_strands: &[("Plants", &["Parts of a plant", "Uses of plants"]), ("Animals", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Environment",
                    sub_strands: &[("Soil", &[]), ("Water", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Human Body",
                    sub_strands: &[("Digestive system", &[]), ("Circulatory system", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Force and Energy",
                    sub_strands: &[("Light", &[]), ("Sound", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Force and Energy",
                    sub_strands: &[("Heat", &[]), ("Electricity", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Computing Devices",
                    sub_strands: &[("Parts of a computer", &[]), ("Safe use of devices", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "Social Studies",
        scheme: NUMERIC,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Natural and Built Environments",
                    sub_strands: &[
                        ("The county", &[]),
                        ("Physical features", &[]),
                        ("Weather and climate", &[]),
                    ],
                },
                StrandShape {
                    number: 2,
                    theme: "People and Population",
                    sub_strands: &[("Ethnic groups", &[]), ("Population distribution", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Social Organisations",
                    sub_strands: &[("The family", &[]), ("School community", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Resources and Economic Activities",
                    sub_strands: &[("Farming", &[]), ("Trade", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Political Systems and Governance",
                    sub_strands: &[("County government", &[]), ("Human rights", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Citizenship",
                    sub_strands: &[
                        ("Good citizenship", &[]),
                        ("Children's rights and responsibilities", &[]),
                    ],
                },
            ],
        ],
    },
    SubjectShape {
        name: "Agriculture and Nutrition",
        scheme: NUMERIC,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Conservation of Resources",
                    sub_strands: &[("Soil conservation", &[]), ("Water conservation", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Food Production",
                    sub_strands: &[("Kitchen garden", &[]), ("Crop growing", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Animal Care",
                    sub_strands: &[("Domestic animals", &[]), ("Small animals", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Nutrition",
                    sub_strands: &[("Food groups", &[]), ("Balanced diet", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Food Production",
                    sub_strands: &[("Harvesting", &[]), ("Storage", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Hygiene Practices",
                    sub_strands: &[("Personal hygiene", &[]), ("Kitchen hygiene", &[])],
                },
            ],
        ],
    },
];

const JUNIOR_SECONDARY: &[SubjectShape] = &[
    SubjectShape {
        name: "Mathematics",
        scheme: NUMERIC,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Numbers",
                    sub_strands: &[
                        ("Integers", &[]),
                        ("Fractions", &[]),
                        ("Squares and square roots", &[]),
                    ],
                },
                StrandShape {
                    number: 2,
                    theme: "Algebra",
                    sub_strands: &[("Algebraic expressions", &[]), ("Linear equations", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Measurements",
                    sub_strands: &[
                        ("Pythagorean relationship", &[]),
                        ("Area", &[]),
                        ("Volume and capacity", &[]),
                    ],
                },
                StrandShape {
                    number: 2,
                    theme: "Algebra",
                    sub_strands: &[("Linear inequalities", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Geometry",
                    sub_strands: &[
                        ("Angles on a straight line", &[]),
                        ("Geometrical constructions", &[]),
                    ],
                },
                StrandShape {
                    number: 2,
                    theme: "Data Handling and Probability",
                    sub_strands: &[("Data presentation", &[]), ("Probability", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "English",
        scheme: NUMERIC,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Listening and Speaking",
                    sub_strands: &[("Pronunciation", &[]), ("Listening comprehension", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Grammar in Use",
                    sub_strands: &[("Word classes", &[]), ("Tenses", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Reading",
                    sub_strands: &[("Intensive reading", &[]), ("Extensive reading", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Writing",
                    sub_strands: &[("Paragraph writing", &[]), ("Mechanics of writing", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Listening and Speaking",
                    sub_strands: &[("Oral presentations", &[]), ("Debate", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Writing",
                    sub_strands: &[("Functional writing", &[]), ("Creative writing", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "Kiswahili",
        scheme: NUMERIC,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Kusikiliza na Kuzungumza",
                    sub_strands: &[("Mazungumzo", &[]), ("Fasihi simulizi", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Sarufi",
                    sub_strands: &[("Aina za maneno", &[]), ("Ngeli za nomino", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Kusoma",
                    sub_strands: &[("Kusoma kwa kina", &[]), ("Kusoma kwa mapana", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Kuandika",
                    sub_strands: &[("Insha za kiuamilifu", &[]), ("Insha za kubuni", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Fasihi",
                    sub_strands: &[("Hadithi fupi", &[]), ("Ushairi", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Sarufi",
                    sub_strands: &[("Uakifishaji", &[]), ("Mnyambuliko wa vitenzi", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "Integrated Science",
        scheme: NUMERIC,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Scientific Investigation",
                    sub_strands: &[
                        ("Laboratory safety", &["Hazard symbols", "First aid"]),
                        ("Laboratory apparatus", &[]),
                    ],
                },
                StrandShape {
                    number: 2,
                    theme: "Mixtures, Elements and Compounds",
                    sub_strands: &[("Mixtures", &[]), ("Acids and bases", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Living Things and Their Environment",
                    sub_strands: &[
                        ("Human reproductive system", &[]),
                        ("Human excretory system", &[]),
                    ],
                },
                StrandShape {
                    number: 2,
                    theme: "Force and Energy",
                    sub_strands: &[("Electrical energy", &[]), ("Magnetism", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Force and Energy",
                    sub_strands: &[("Heat transfer", &[]), ("Pressure", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Living Things and Their Environment",
                    sub_strands: &[("Nutrition in plants", &[]), ("Ecosystems", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "Pre-Technical Studies",
        scheme: NUMERIC,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Foundations of Pre-Technical Studies",
                    sub_strands: &[
                        ("Safety in the workshop", &[]),
                        ("Handling hazardous materials", &[]),
                    ],
                },
                StrandShape {
                    number: 2,
                    theme: "Communication",
                    sub_strands: &[("Geometrical constructions", &[]), ("Oblique projection", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Materials for Production",
                    sub_strands: &[("Wood", &[]), ("Metals", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Tools and Production",
                    sub_strands: &[("Holding tools", &[]), ("Cutting tools", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Entrepreneurship",
                    sub_strands: &[("Financial services", &[]), ("Business plan", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Communication",
                    sub_strands: &[("Visual programming", &[]), ("Computer hardware", &[])],
                },
            ],
        ],
    },
    SubjectShape {
        name: "Social Studies",
        scheme: NUMERIC,
        terms: [
            &[
                StrandShape {
                    number: 1,
                    theme: "Social Studies and Personal Development",
                    sub_strands: &[("Pathways", &[]), ("Self-awareness", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Community Service Learning",
                    sub_strands: &[("Community project", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "People, Population and Relationships",
                    sub_strands: &[("Early civilisations", &[]), ("Trans-Saharan trade", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Natural and Historic Built Environments",
                    sub_strands: &[("Topographical maps", &[]), ("Weather", &[])],
                },
            ],
            &[
                StrandShape {
                    number: 1,
                    theme: "Political Development and Governance",
                    sub_strands: &[("The constitution of Kenya", &[]), ("Citizenship", &[])],
                },
                StrandShape {
                    number: 2,
                    theme: "Natural and Historic Built Environments",
                    sub_strands: &[("Historic sites and monuments", &[])],
                },
            ],
        ],
    },
];
