//! The event catalogue shipped with the server.
//!
//! Years are the commonly cited ones; negative years are BCE.

use histime_protocol::{Card, CardId, Difficulty};

use Difficulty::{Easy, Hard, Medium};

const EVENTS: &[(&str, &str, i32, &str, Difficulty)] = &[
    // -- easy --
    ("moon-landing", "First crewed Moon landing", 1969, "exploration", Easy),
    ("columbus-americas", "Columbus reaches the Americas", 1492, "exploration", Easy),
    ("bastille", "Storming of the Bastille", 1789, "politics", Easy),
    ("ww1-outbreak", "Outbreak of World War I", 1914, "war", Easy),
    ("ww2-end", "End of World War II", 1945, "war", Easy),
    ("berlin-wall-fall", "Fall of the Berlin Wall", 1989, "politics", Easy),
    ("us-independence", "US Declaration of Independence", 1776, "politics", Easy),
    ("titanic", "Sinking of the Titanic", 1912, "technology", Easy),
    ("wright-flight", "Wright brothers' first powered flight", 1903, "technology", Easy),
    ("world-wide-web", "World Wide Web proposed at CERN", 1989, "technology", Easy),
    ("mona-lisa", "Leonardo begins the Mona Lisa", 1503, "art", Easy),
    ("printing-press", "Gutenberg's printing press", 1440, "technology", Easy),
    ("magna-carta", "Magna Carta sealed", 1215, "politics", Easy),
    ("penicillin", "Fleming discovers penicillin", 1928, "science", Easy),
    ("origin-of-species", "On the Origin of Species published", 1859, "science", Easy),
    ("first-iphone", "First iPhone released", 2007, "technology", Easy),
    // -- medium --
    ("hastings", "Battle of Hastings", 1066, "war", Medium),
    ("black-death", "Black Death reaches Europe", 1347, "science", Medium),
    ("principia", "Newton publishes the Principia", 1687, "science", Medium),
    ("magellan", "Magellan expedition completes circumnavigation", 1522, "exploration", Medium),
    ("waterloo", "Battle of Waterloo", 1815, "war", Medium),
    ("watt-engine", "Watt patents his improved steam engine", 1769, "technology", Medium),
    ("sistine-ceiling", "Sistine Chapel ceiling completed", 1512, "art", Medium),
    ("suez-canal", "Suez Canal opens", 1869, "technology", Medium),
    ("telephone", "Bell patents the telephone", 1876, "technology", Medium),
    ("october-revolution", "October Revolution in Russia", 1917, "politics", Medium),
    ("dna-structure", "Double-helix structure of DNA described", 1953, "science", Medium),
    ("sputnik", "Sputnik 1 launched", 1957, "exploration", Medium),
    ("gettysburg", "Battle of Gettysburg", 1863, "war", Medium),
    ("starry-night", "Van Gogh paints The Starry Night", 1889, "art", Medium),
    ("united-nations", "United Nations founded", 1945, "politics", Medium),
    ("special-relativity", "Special relativity published", 1905, "science", Medium),
    // -- hard --
    ("hammurabi", "Code of Hammurabi inscribed", -1754, "politics", Hard),
    ("marathon", "Battle of Marathon", -490, "war", Hard),
    ("rome-founded", "Traditional founding of Rome", -753, "politics", Hard),
    ("qin-unification", "Qin unifies China", -221, "politics", Hard),
    ("caesar-assassinated", "Assassination of Julius Caesar", -44, "politics", Hard),
    ("vesuvius", "Vesuvius buries Pompeii", 79, "science", Hard),
    ("hagia-sophia", "Hagia Sophia completed", 537, "art", Hard),
    ("tours", "Battle of Tours", 732, "war", Hard),
    ("charlemagne", "Charlemagne crowned emperor", 800, "politics", Hard),
    ("vinland", "Leif Erikson reaches Vinland", 1000, "exploration", Hard),
    ("gunpowder-formula", "Earliest written gunpowder formula", 1044, "technology", Hard),
    ("zheng-he", "Zheng He's first treasure voyage", 1405, "exploration", Hard),
    ("constantinople-falls", "Fall of Constantinople", 1453, "war", Hard),
    ("kepler-laws", "Kepler publishes his first laws of planetary motion", 1609, "science", Hard),
    ("westphalia", "Peace of Westphalia", 1648, "politics", Hard),
    ("rosetta-stone", "Rosetta Stone discovered", 1799, "art", Hard),
];

pub(crate) fn cards() -> Vec<Card> {
    EVENTS
        .iter()
        .map(|&(id, title, year, category, difficulty)| Card {
            id: CardId(id.to_string()),
            title: title.to_string(),
            year,
            category: category.to_string(),
            difficulty,
        })
        .collect()
}
