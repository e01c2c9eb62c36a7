// Synonym tables for canonical attribute extraction.
//
// Order matters in every table here: scanning takes the first hit, so
// multi-word synonyms and larger tiers must be declared before anything
// they contain as a substring.

/// Canonical color key -> synonyms (English and Russian spellings,
/// pre-normalized: lowercase, "е" instead of "ё").
/// Scanned in declaration order; first key with a substring hit wins.
pub const COLORS: &[(&str, &[&str])] = &[
    ("desert_titanium", &["desert titanium"]),
    (
        "space_black",
        &[
            "space black",
            "spaceblack",
            "космический черный",
        ],
    ),
    (
        "space_gray",
        &["space gray", "space grey", "spacegray", "серый космос"],
    ),
    (
        "midnight",
        &["midnight", "темная ночь", "полуночный черный"],
    ),
    ("starlight", &["starlight", "сияющая звезда"]),
    ("rose_gold", &["rose gold", "rosegold"]),
    (
        "light_gold",
        &["light gold", "светло-золотой", "светло золотой"],
    ),
    ("ultramarine", &["ultramarine", "ультрамариновый"]),
    (
        "light_blue",
        &[
            "sky blue",
            "skyblue",
            "mist blue",
            "туманно-голубой",
            "туманно голубой",
            "небесно-голубой",
            "небесно голубой",
            "голубое небо",
            "голубой",
        ],
    ),
    ("teal", &["teal", "бирюзовый"]),
    ("sage", &["sage"]),
    ("lavender", &["lavender", "лавандовый"]),
    ("purple", &["purple", "фиолетовый"]),
    ("blue", &["blue", "темно-синий", "синий"]),
    ("green", &["green", "зеленый"]),
    ("yellow", &["yellow", "желтый"]),
    ("pink", &["pink", "розовый"]),
    ("orange", &["orange", "оранжевый", "cosmic orange"]),
    ("red", &["red", "красный"]),
    ("beige", &["beige", "бежевый"]),
    ("silver", &["silver", "серебристый"]),
    ("gray", &["gray", "grey", "серый"]),
    ("white", &["white", "белый"]),
    ("black", &["black", "черный"]),
];

/// Storage ladder, smallest tier first. First matching tier wins, so a
/// title saying "128gb" never also registers as "28".
pub const STORAGE: &[(&str, &[&str])] = &[
    ("64gb", &["64", "64gb", "64 gb", "64гб", "64 гб"]),
    ("128gb", &["128", "128gb", "128 gb", "128гб", "128 гб"]),
    ("256gb", &["256", "256gb", "256 gb", "256гб", "256 гб"]),
    ("512gb", &["512", "512gb", "512 gb", "512гб", "512 гб"]),
    ("1tb", &["1tb", "1 tb", "1тб", "1 тб"]),
    ("2tb", &["2tb", "2 tb", "2тб", "2 тб"]),
];

/// Noise vocabulary: accessories, repair services and used/refurbished
/// listings that must never win for a device query. Matched on word
/// boundaries against the normalized title.
pub const STOP_WORDS: &[&str] = &[
    "чехол",
    "чехлы",
    "case",
    "кейс",
    "стекло",
    "пленка",
    "бампер",
    "кабель",
    "зарядка",
    "ремонт",
    "замена",
    "запчасти",
    "разбор",
    "дисплей",
    "копия",
    "реплика",
    "муляж",
    "б/у",
    "восстановленный",
    "refurbished",
];

/// iPhone generations in descending order, newest first, so that a
/// larger number is never shadowed by a smaller one.
pub const IPHONE_MODELS: &[&str] = &["17", "16", "15", "14", "13"];

/// Allowed screen sizes per category.
pub const MACBOOK_SIZES: &[u32] = &[13, 14, 15, 16];
pub const IPAD_SIZES: &[u32] = &[7, 8, 9, 10, 11, 12, 13];
