// src/landing/content.rs
//! Literal landing page content. Fixed at build time.

pub const BRAND: &str = "EVIA";
pub const BRAND_SUFFIX: &str = "Ecosystem";
pub const TELEGRAM_URL: &str = "https://t.me/igorgorbulev";

#[derive(Debug, Clone, Copy)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

pub const NAV_LINKS: [NavLink; 3] = [
    NavLink {
        label: "Проекты",
        href: "#projects",
    },
    NavLink {
        label: "Принципы",
        href: "#principles",
    },
    NavLink {
        label: "Команда",
        href: "#team",
    },
];

pub const JOIN_LABEL: &str = "Присоединиться";

#[derive(Debug, Clone, Copy)]
pub struct Hero {
    pub badge: &'static str,
    pub title: &'static str,
    pub lead: &'static str,
    pub highlights: [&'static str; 3],
    pub primary_cta: &'static str,
    pub secondary_cta: &'static str,
    pub tags: [&'static str; 6],
}

pub const HERO: Hero = Hero {
    badge: "🌱 Экосистема будущего",
    title: "EVIA",
    lead: "Экосистема проектов для запуска и масштабирования импакт-инициатив на стыке",
    highlights: ["технологий", "предпринимательства", "личной эволюции"],
    primary_cta: "Присоединиться к экосистеме",
    secondary_cta: "Узнать больше о проектах",
    tags: [
        "#Импакт-предпринимательство",
        "#Web3",
        "#БирюзовыеПрактики",
        "#Инновации",
        "#СпиральнаяДинамика",
        "#ИнновационноеМышление",
    ],
};

#[derive(Debug, Clone, Copy)]
pub struct Partner {
    pub role: &'static str,
    pub description: &'static str,
    /// Empty when the role has no seniority badge.
    pub level: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Project {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub mission: &'static str,
    pub partners: &'static [Partner],
    /// Bare host or full URL; `None` hides the project link.
    pub url: Option<&'static str>,
}

impl Project {
    /// Link target, with `https://` added to bare hosts.
    pub fn href(&self) -> Option<String> {
        self.url.map(|u| {
            if u.starts_with("http://") || u.starts_with("https://") {
                u.to_string()
            } else {
                format!("https://{u}")
            }
        })
    }
}

pub const PROJECTS_HEADING: &str = "Направления и партнёрства";
pub const PROJECTS_LEAD: &str =
    "Четыре взаимосвязанных проекта, где ищем исключительные таланты для создания будущего";
pub const PROJECTS_TAGLINE: &str = "Присоединяйтесь к команде мирового уровня";

pub const PROJECTS: [Project; 4] = [
    Project {
        title: "EVIA Studio",
        subtitle: "Студия поддержки микробизнеса",
        description: "Студия поддержки микробизнеса и креативных команд, которые запускают авторские продукты. AI-маркетинг, автоматизация продаж, MVP-воронки.",
        mission: "Ускорение выхода на рынок для креативных предпринимателей",
        partners: &[Partner {
            role: "Инвестор",
            description: "💸 Инвестиции от 500 т.р. за долю 15–30% в EVIA Studio — проект поддержки авторских и креативных проектов.",
            level: "",
        }],
        url: Some("evia-plum.vercel.app"),
    },
    Project {
        title: "EVIA.AI",
        subtitle: "Модульная AI-платформа",
        description: "Модульная AI-платформа для автоматизации бизнес-функций в МСБ. Кастомные агенты (GPT+LangChain), база знаний, AI-аналитика.",
        mission: "Демократизация AI-технологий для малого бизнеса",
        partners: &[
            Partner {
                role: "PR-стратег / Коммуникатор",
                description: "Медиа-стратегии, партнёрства, брендинг",
                level: "Senior+",
            },
            Partner {
                role: "Инвестор-партнер",
                description: "💸 От 1 млн. ₽ за долю 15–50% в AI-инфраструктуре для малого бизнеса.",
                level: "",
            },
        ],
        url: Some("https://neon-den5-q4vp.vercel.app/"),
    },
    Project {
        title: "EVIA Club",
        subtitle: "Синдицирование проектов",
        description: "Синдицирование проектов от $100/мес. Поиск, проверка и поддержка команд на стадии идеи и MVP.",
        mission: "Создание экосистемы взаимной поддержки предпринимателей",
        partners: &[
            Partner {
                role: "Импакт-инвестор",
                description: "Со-архитектор модели инвестирования, управление сделками",
                level: "Expert",
            },
            Partner {
                role: "Микро-инвесторы / Члены клуба",
                description: "💵 Участие в проверенных проектах от $100 в месяц.",
                level: "",
            },
        ],
        url: None,
    },
    Project {
        title: "EVIA DAO",
        subtitle: "Децентрализованное сообщество",
        description: "Исследовательско-образовательное пространство и децентрализованное сообщество. Образование, этика, исследование, co-creation.",
        mission: "Место для осознанных лидеров, меняющих мир",
        partners: &[
            Partner {
                role: "Архитектор DAO",
                description: "Построение системы управления, культуры",
                level: "Expert",
            },
            Partner {
                role: "Советник по стратегии DAO (мыслитель, социолог)",
                description: "🧭 Культурная и этическая направленность DAO.",
                level: "Expert",
            },
            Partner {
                role: "Импакт-инвестор",
                description: "💰 Настройка фонда DAO и системы распределения капиталов.",
                level: "",
            },
            Partner {
                role: "Комьюнити-лидер",
                description: "🌱 Контент-стратегия, развитие сообщества, фасилитация",
                level: "Senior",
            },
        ],
        url: Some("eviaai.ru"),
    },
];

#[derive(Debug, Clone, Copy)]
pub struct Principle {
    pub title: &'static str,
    pub description: &'static str,
}

pub const PRINCIPLES_HEADING: &str = "Принципы";
pub const PRINCIPLES_LEAD: &str = "Философия, которая лежит в основе всех наших проектов";

pub const PRINCIPLES: [Principle; 6] = [
    Principle {
        title: "Бирюзовые практики",
        description: "Самоуправление, эволюционное предназначение, целостность",
    },
    Principle {
        title: "Спиральная динамика",
        description: "Эволюция уровней сознания и интеграция ценностей",
    },
    Principle {
        title: "Web3 & DAO",
        description: "Прозрачность, доверие, децентрализация как основа новой экономики",
    },
    Principle {
        title: "Импакт-предпринимательство",
        description: "Технологии ради значимых изменений в мире",
    },
    Principle {
        title: "Инновационное мышление",
        description: "Нестандартные идеи и оригинальные решения. Гибкость и Открытость новому",
    },
    Principle {
        title: "Эволюция через со-творчество",
        description: "Коллективное развитие и творческое мышление. Создаём не продукты, а эволюционные среды",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct TeamMember {
    pub name: &'static str,
    pub role: &'static str,
    pub bio: &'static str,
    pub initials: &'static str,
    pub telegram: &'static str,
}

pub const TEAM_HEADING: &str = "Команда";
pub const TEAM_LEAD: &str = "Опытные предприниматели и продуктологи, создающие будущее вместе";

pub const TEAM: [TeamMember; 2] = [
    TeamMember {
        name: "Игорь Горбулев",
        role: "CEO & Founder",
        bio: "13+ лет в бизнесе, 2 реализованных проекта, успешный exit (Energiatrend.ru). Оборот 300+ млн ₽",
        initials: "ИГ",
        telegram: "https://t.me/freesion_1",
    },
    TeamMember {
        name: "Дмитрий Филатов",
        role: "Ментор • Технологический стратег",
        bio: "Основатель Topface, Playneta, Cryptobots. 150+ млн пользователей",
        initials: "ДФ",
        telegram: "https://t.me/fil100",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct Investment {
    pub heading: &'static str,
    pub amount: &'static str,
    pub instrument: &'static str,
    pub purpose: &'static str,
    pub perks: [&'static str; 2],
    pub cta: &'static str,
}

pub const INVESTMENT: Investment = Investment {
    heading: "Инвестиционная возможность",
    amount: "1 млн ₽",
    instrument: "SAFE/DAO",
    purpose: "Ускорить рост платформы EVIA.AI, расширить студийные мощности и запустить первые синдикаты",
    perks: ["Влияние на развитие", "Эксклюзивное комьюнити"],
    cta: "Обсудить инвестиции",
};

#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub heading: &'static str,
    pub lead: &'static str,
    pub roles: [&'static str; 6],
    pub cta: &'static str,
}

pub const CONTACT: Contact = Contact {
    heading: "Присоединяйся к экосистеме будущего",
    lead: "Мы ищем со-архитекторов, визионеров, технарей, фасилитаторов, менторов и инвесторов",
    roles: [
        "Со-архитекторы",
        "Визионеры",
        "Технари",
        "Фасилитаторы",
        "Менторы",
        "Инвесторы",
    ],
    cta: "Написать в Telegram: @igorgorbulev",
};

pub const FOOTER_NOTE: &str = "© EVIA 2025. Осознанные технологии для будущего.";

pub const FOOTER_LINKS: [NavLink; 3] = [
    NavLink {
        label: "Telegram",
        href: TELEGRAM_URL,
    },
    NavLink {
        label: "GitHub",
        href: "#",
    },
    NavLink {
        label: "Документы",
        href: "#",
    },
];
