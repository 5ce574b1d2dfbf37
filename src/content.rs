//! Static copy for the page sections.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub aria_label: &'static str,
    pub anchor: &'static str,
    pub hover_bg: &'static str,
}

pub const MENU: &[MenuItem] = &[
    MenuItem {
        label: "home",
        aria_label: "Home",
        anchor: "#",
        hover_bg: "#3b82f6",
    },
    MenuItem {
        label: "about",
        aria_label: "About",
        anchor: "#about",
        hover_bg: "#10b981",
    },
    MenuItem {
        label: "projects",
        aria_label: "Projects",
        anchor: "#projects",
        hover_bg: "#f59e0b",
    },
    MenuItem {
        label: "blog",
        aria_label: "Blog",
        anchor: "#",
        hover_bg: "#ef4444",
    },
    MenuItem {
        label: "contact",
        aria_label: "Contact",
        anchor: "#contact",
        hover_bg: "#8b5cf6",
    },
];

pub struct Hero {
    pub name: &'static str,
    pub tagline: &'static str,
    pub logo_hint: &'static str,
    pub actions: &'static [&'static str],
}

pub const HERO: Hero = Hero {
    name: "Abishai K C",
    tagline: "Designing Intelligence",
    logo_hint: "Hold for secrets...",
    actions: &["My Resume", "Contact Me"],
};

pub struct About {
    pub bio: &'static str,
    pub location: &'static str,
    pub degree: &'static str,
    pub year: &'static str,
    pub arsenal: &'static [&'static str],
    pub researching: &'static str,
}

pub const ABOUT: About = About {
    bio: "I am an AI practitioner who believes that the best code is the kind that can be explained. My background spans Machine Learning, Deep Learning, and LLMs, honed through competitive datathons and internship roles. I love the challenge of research, but I'm equally passionate about communication, breaking down technical complexity to collaborate effectively and drive meaningful results.",
    location: "Based in India, Tamil Nadu, Chennai.",
    degree: "BTech AIML",
    year: "IIIrd Year",
    arsenal: &[
        "Python Programming",
        "Applied Data Science",
        "Machine Learning & Deep Learning",
        "Data Analytics",
        "Git & GitHub",
        "Fine-tuning & RAG",
    ],
    researching: "AI agents & SLMs",
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardTone {
    Dark,
    Grey,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Project {
    pub title: &'static str,
    pub link: &'static str,
    pub description: &'static str,
    pub stack: &'static [&'static str],
    pub tone: CardTone,
}

pub const PROJECTS: &[Project] = &[
    Project {
        title: "FloodGuard",
        link: "https://github.com/MOHAMEDAHSAN/floodguard",
        description: "Built a dual-portal flood simulation and emergency-response system using an ensemble of LSTM and Random Forest models to predict 5-day water level rise. Integrated a public complaint portal with geolocation and weather APIs for real-time distress reporting.",
        stack: &["React", "TypeScript", "Flask", "Supabase", "Python"],
        tone: CardTone::Dark,
    },
    Project {
        title: "TrueFIR",
        link: "https://github.com/Abishai95141/TrueFIR/blob/main/README.md",
        description: "Created a blockchain-powered FIR filing system optimized for minimal gas costs, with integrated anomaly-detection logs to prevent misuse and ensure data integrity.",
        stack: &["Solidity", "Polygon testnet", "Pinata(IPFS)", "Web3", "React"],
        tone: CardTone::Grey,
    },
    Project {
        title: "Taxonomist-Gidy",
        link: "https://github.com/MOHAMEDAHSAN/taxonomist-gidy",
        description: "Designed a tax-policy simulation and GDP prediction platform using agent-based modeling linked to economic indicators. Developed an interactive interface for scenario analysis and budget allocation.",
        stack: &["Python", "React", "TypeScript"],
        tone: CardTone::Dark,
    },
    Project {
        title: "LexIntel",
        link: "https://github.com/Abishai95141/LexIntel-LawFirm",
        description: "LexIntel is an on-premises AI assistant that orchestrates a fine-tuned 7B-parameter Mistral model through a modular, multi-agent pipeline. All components run within client infrastructure. By decomposing report generation into discrete Planner, Retriever, Drafter, Summarizer, and Formatter agents, LexIntel maximizes coherence within context limits and automates styling, citations, and research.",
        stack: &["Python", "Mistral 7B", "LangChain", "Multi-agent framework"],
        tone: CardTone::Grey,
    },
    Project {
        title: "CampaignIQ",
        link: "https://github.com/Abishai95141/CampaignIQ",
        description: "CampaignIQ is a state-of-the-art analytical solution that leverages causal inference to provide health organizations with precise, unbiased measures of campaign metrics and actionable insights for strategic resource allocation.",
        stack: &["Python", "React", "TypeScript", "IBM LinuxOne Cloud"],
        tone: CardTone::Dark,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineEvent {
    pub title: &'static str,
    pub date: &'static str,
    pub description: &'static str,
}

pub const EXPERIENCE: &[TimelineEvent] = &[
    TimelineEvent {
        title: "GNS AI, Research Intern",
        date: "July 2024",
        description: "Contributed to core research initiatives related to product development and market research.",
    },
    TimelineEvent {
        title: "KU Hackathon",
        date: "February 2025",
        description: "Participated in my first 24-hour hackathon at Kalinga University. After traveling over 1,500 km to attend, we were shortlisted into the final 10, competing against top teams from IITs and NITs.",
    },
    TimelineEvent {
        title: "Gidy Hackathon Victory",
        date: "March 2024",
        description: "Secured 1st place at the Techpreneur Hackathon hosted by Gidy.ai at Saveetha Engineering College. Out of 100+ registered teams, we clinched the victory with \"FiscalAI,\" our AI-driven GDP growth prediction and budget allocation model.",
    },
    TimelineEvent {
        title: "\"Breaking the Brain\" Workshop Host",
        date: "June 2025",
        description: "Organized and hosted a technical workshop designed to demystify Large Language Models. I guided participants through the internal architecture of LLMs and led a hands-on session where they fine-tuned a model for the first time.",
    },
    TimelineEvent {
        title: "NASSCOM Developer Confluence",
        date: "August 2025",
        description: "Shortlisted to present our research work at this prestigious conference. We proudly represented Saveetha Engineering College, showcasing our findings to a panel of industry experts and leaders.",
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Certification {
    pub title: &'static str,
    pub description: &'static str,
    pub link: &'static str,
}

pub const CERTIFICATIONS: &[Certification] = &[
    Certification {
        title: "AWS Certified Solutions Architect",
        description: "Professional certification demonstrating expertise in designing distributed systems on AWS",
        link: "https://aws.amazon.com/certification/certified-solutions-architect-professional/",
    },
    Certification {
        title: "Google Data Analytics Professional",
        description: "Comprehensive certification covering data analysis, visualization, and business intelligence",
        link: "https://www.coursera.org/professional-certificates/google-data-analytics",
    },
    Certification {
        title: "Machine Learning Specialization",
        description: "Deep learning and neural networks certification from Stanford University and DeepLearning.AI",
        link: "https://www.coursera.org/specializations/machine-learning-introduction",
    },
    Certification {
        title: "PostgreSQL Database Administration",
        description: "Advanced database design, optimization, and administration certification",
        link: "https://www.postgresql.org/docs/current/",
    },
    Certification {
        title: "Certified Ethical Hacker (CEH)",
        description: "Industry-recognized cybersecurity certification covering penetration testing and security",
        link: "https://www.eccouncil.org/programs/certified-ethical-hacker-ceh/",
    },
    Certification {
        title: "Professional Scrum Master",
        description: "Agile methodology and Scrum framework certification for project management",
        link: "https://www.scrum.org/professional-scrum-master-i-certification",
    },
];

pub struct Contact {
    pub email: &'static str,
    pub linkedin: &'static str,
    pub github: &'static str,
}

pub const CONTACT: Contact = Contact {
    email: "abishaioff@gmail.com",
    linkedin: "https://www.linkedin.com/in/abishai-k-c-6a5288271/",
    github: "https://github.com/Abishai95141",
};

impl Contact {
    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn external_links() -> impl Iterator<Item = &'static str> {
        PROJECTS
            .iter()
            .map(|project| project.link)
            .chain(CERTIFICATIONS.iter().map(|cert| cert.link))
            .chain([CONTACT.linkedin, CONTACT.github])
    }

    #[test]
    fn external_links_are_absolute_https_urls() {
        for link in external_links() {
            let parsed = url::Url::parse(link).expect("link parses");
            assert_eq!(parsed.scheme(), "https", "{link}");
            assert!(parsed.query().is_none(), "{link} carries tracking params");
        }
    }

    #[test]
    fn section_sizes() {
        assert_eq!(MENU.len(), 5);
        assert_eq!(PROJECTS.len(), 5);
        assert_eq!(EXPERIENCE.len(), 5);
        assert_eq!(CERTIFICATIONS.len(), 6);
    }

    #[test]
    fn project_cards_alternate_tone() {
        for pair in PROJECTS.windows(2) {
            assert_ne!(pair[0].tone, pair[1].tone);
        }
    }

    #[test]
    fn mailto_link() {
        assert_eq!(CONTACT.mailto(), "mailto:abishaioff@gmail.com");
    }
}
