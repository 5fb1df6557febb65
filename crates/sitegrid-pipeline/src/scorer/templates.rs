//! One insight template per rule id.

use sitegrid_core::{EffortLevel, ExpectedImpact, ImpactLevel, InsightType, SpecDetails};

use ImpactLevel::{High, Low, Medium, None as NoImpact};

#[derive(Debug, Clone, Copy)]
pub struct TemplateDetails {
    pub page_type: Option<&'static str>,
    pub component: Option<&'static str>,
    pub content: &'static [&'static str],
    pub design: &'static [&'static str],
    pub placement: Option<&'static str>,
    pub schema: &'static [&'static str],
}

impl TemplateDetails {
    const EMPTY: Self = Self {
        page_type: None,
        component: None,
        content: &[],
        design: &[],
        placement: None,
        schema: &[],
    };

    pub fn to_spec_details(self) -> SpecDetails {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
        SpecDetails {
            page_type: self.page_type.map(str::to_string),
            component: self.component.map(str::to_string),
            content_requirements: owned(self.content),
            design_requirements: owned(self.design),
            placement: self.placement.map(str::to_string),
            schema_requirements: owned(self.schema),
        }
    }
}

/// Text and scoring inputs for the insight a rule's findings produce.
#[derive(Debug, Clone, Copy)]
pub struct InsightTemplate {
    pub rule_id: &'static str,
    pub title: &'static str,
    pub problem: &'static str,
    pub hypothesis: &'static str,
    pub spec_change: &'static str,
    pub details: Option<TemplateDetails>,
    pub impact: ExpectedImpact,
    pub effort: EffortLevel,
    pub insight_type: InsightType,
}

/// Templates in synthesis order.
pub const TEMPLATES: &[InsightTemplate] = &[
    InsightTemplate {
        rule_id: "review_gap",
        title: "Improve Review Visibility",
        problem: "Review count below competitive benchmark",
        hypothesis: "Higher review visibility builds trust and improves conversion rate",
        spec_change: "Add prominent review widget above fold on all service pages",
        details: Some(TemplateDetails {
            component: Some("ReviewsWidget"),
            placement: Some("Above fold, after hero"),
            content: &[
                "Show aggregate rating",
                "Show review count",
                "Link to Google reviews",
            ],
            ..TemplateDetails::EMPTY
        }),
        impact: ExpectedImpact::new(Low, High, High, High),
        effort: EffortLevel::Low,
        insight_type: InsightType::TrustGap,
    },
    InsightTemplate {
        rule_id: "gallery_presence",
        title: "Add Before/After Gallery",
        problem: "Missing visual proof of work that competitors display",
        hypothesis: "Before/after photos build trust and demonstrate expertise",
        spec_change: "Create dedicated gallery page and embed galleries on service pages",
        details: Some(TemplateDetails {
            page_type: Some("gallery"),
            component: Some("BeforeAfterGallery"),
            content: &[
                "Minimum 10 before/after pairs",
                "Organized by service type",
                "Location tags for local relevance",
            ],
            design: &["Slider comparison view", "Lightbox for full-size viewing"],
            ..TemplateDetails::EMPTY
        }),
        impact: ExpectedImpact::new(Medium, High, High, Medium),
        effort: EffortLevel::Medium,
        insight_type: InsightType::TrustGap,
    },
    InsightTemplate {
        rule_id: "sticky_cta",
        title: "Implement Sticky CTA",
        problem: "No persistent call-to-action as users scroll",
        hypothesis: "Sticky CTAs keep conversion action visible and reduce friction",
        spec_change: "Add sticky header or mobile sticky bar with click-to-call",
        details: Some(TemplateDetails {
            component: Some("StickyCTA"),
            placement: Some("Fixed header on scroll"),
            design: &[
                "Phone number always visible",
                "Click-to-call on mobile",
                "Contrasting CTA button",
            ],
            ..TemplateDetails::EMPTY
        }),
        impact: ExpectedImpact::new(NoImpact, High, Low, High),
        effort: EffortLevel::Low,
        insight_type: InsightType::ConversionGap,
    },
    InsightTemplate {
        rule_id: "service_area_coverage",
        title: "Expand Service Area Pages",
        problem: "Competitors have dedicated service area pages we're missing",
        hypothesis: "Location-specific pages improve local rankings for each area",
        spec_change: "Create service-area pages for each target location",
        details: Some(TemplateDetails {
            page_type: Some("service-area"),
            content: &[
                "Location-specific content",
                "Local testimonials",
                "Service area map",
                "Travel time from primary location",
            ],
            schema: &["LocalBusiness", "GeoCircle"],
            ..TemplateDetails::EMPTY
        }),
        impact: ExpectedImpact::new(High, Medium, Medium, Medium),
        effort: EffortLevel::Medium,
        insight_type: InsightType::LocalSeoFix,
    },
    InsightTemplate {
        rule_id: "backlink_gap",
        title: "Build Domain Authority",
        problem: "Domain authority below competitive benchmark",
        hypothesis: "Higher authority improves organic rankings across all keywords",
        spec_change: "Implement backlink acquisition strategy targeting local directories and industry sites",
        details: None,
        impact: ExpectedImpact::new(High, Low, Medium, Low),
        effort: EffortLevel::High,
        insight_type: InsightType::BacklinkOpportunity,
    },
    InsightTemplate {
        rule_id: "chat_widget",
        title: "Add Live Chat",
        problem: "Missing live chat option that competitors offer",
        hypothesis: "Chat provides immediate engagement for high-intent visitors",
        spec_change: "Implement chat widget (e.g., Intercom, Tawk.to)",
        details: None,
        impact: ExpectedImpact::new(NoImpact, Medium, Low, High),
        effort: EffortLevel::Low,
        insight_type: InsightType::ConversionGap,
    },
    InsightTemplate {
        rule_id: "blog_activity",
        title: "Start Content Marketing",
        problem: "No active blog while competitors publish content",
        hypothesis: "Content marketing builds authority and captures informational queries",
        spec_change: "Create blog and publish 2-4 articles per month",
        details: Some(TemplateDetails {
            page_type: Some("blog"),
            content: &[
                "Educational content about services",
                "Local/seasonal content",
                "FAQ articles",
                "How-to guides",
            ],
            ..TemplateDetails::EMPTY
        }),
        impact: ExpectedImpact::new(Medium, Low, Medium, Low),
        effort: EffortLevel::High,
        insight_type: InsightType::ContentGap,
    },
    InsightTemplate {
        rule_id: "content_depth",
        title: "Deepen Service Page Content",
        problem: "Competitor service pages carry substantially more content",
        hypothesis: "In-depth service pages rank for more long-tail queries and answer buyer questions",
        spec_change: "Expand each money service page to 1,500+ words with process, pricing and FAQs",
        details: Some(TemplateDetails {
            page_type: Some("service"),
            content: &[
                "Process walkthrough",
                "Pricing factors",
                "Service-specific FAQs",
                "Local project examples",
            ],
            schema: &["Service", "FAQPage"],
            ..TemplateDetails::EMPTY
        }),
        impact: ExpectedImpact::new(High, Low, Medium, Low),
        effort: EffortLevel::Medium,
        insight_type: InsightType::ContentGap,
    },
    InsightTemplate {
        rule_id: "grid_ranking",
        title: "Win the Local Pack",
        problem: "Competitors dominate local map results across the service grid",
        hypothesis: "Stronger local signals move the business into the top-3 map results",
        spec_change: "Build location-specific pages and strengthen business-profile signals for each target city",
        details: Some(TemplateDetails {
            page_type: Some("service-area"),
            content: &[
                "City-specific service copy",
                "Embedded map and directions",
                "Local reviews per city",
            ],
            schema: &["LocalBusiness", "GeoCircle"],
            ..TemplateDetails::EMPTY
        }),
        impact: ExpectedImpact::new(High, Medium, Low, Low),
        effort: EffortLevel::High,
        insight_type: InsightType::LocalSeoFix,
    },
    InsightTemplate {
        rule_id: "certification_check",
        title: "Display Certifications & Licenses",
        problem: "Competitors prominently display credentials we don't surface",
        hypothesis: "Visible licenses and certifications reduce hiring anxiety",
        spec_change: "Add a credentials strip with license numbers and certification badges site-wide",
        details: Some(TemplateDetails {
            component: Some("TrustBadges"),
            placement: Some("Below hero on all pages"),
            content: &[
                "License number",
                "Insurance coverage statement",
                "Certification badges",
                "Years in business",
            ],
            ..TemplateDetails::EMPTY
        }),
        impact: ExpectedImpact::new(Low, Medium, High, Medium),
        effort: EffortLevel::Low,
        insight_type: InsightType::TrustGap,
    },
    InsightTemplate {
        rule_id: "online_booking",
        title: "Implement Online Booking System",
        problem: "Missing or suboptimal online booking that competitors offer",
        hypothesis: "Seamless online booking reduces friction and increases conversion rate",
        spec_change: "Implement robust online booking with real-time availability",
        details: Some(TemplateDetails {
            component: Some("BookingWidget"),
            placement: Some("Above fold on all pages"),
            content: &[
                "Real-time availability calendar",
                "Group size selection",
                "Date and time picker",
                "Instant confirmation",
            ],
            design: &[
                "Mobile-optimized",
                "2-3 step booking flow",
                "Clear pricing display",
            ],
            ..TemplateDetails::EMPTY
        }),
        impact: ExpectedImpact::new(NoImpact, High, Medium, High),
        effort: EffortLevel::Medium,
        insight_type: InsightType::ConversionGap,
    },
    InsightTemplate {
        rule_id: "experience_photo",
        title: "Showcase Experience Photos & Videos",
        problem: "Missing visual content that showcases the experience",
        hypothesis: "Immersive photos and videos build anticipation and drive bookings",
        spec_change: "Create immersive photo gallery and promo video for each experience",
        details: Some(TemplateDetails {
            page_type: Some("service"),
            component: Some("ExperienceGallery"),
            content: &[
                "Atmospheric room photos",
                "Teaser video trailer",
                "No spoilers - maintain mystery",
                "Group photos with permission",
            ],
            design: &[
                "Full-screen gallery option",
                "Video autoplay on hero",
                "Carousel for multiple experiences",
            ],
            ..TemplateDetails::EMPTY
        }),
        impact: ExpectedImpact::new(Medium, High, High, Medium),
        effort: EffortLevel::Medium,
        insight_type: InsightType::TrustGap,
    },
    InsightTemplate {
        rule_id: "group_packages",
        title: "Promote Group & Corporate Packages",
        problem: "Missing or hidden group booking and corporate options",
        hypothesis: "Group/corporate bookings have higher average order value",
        spec_change: "Create dedicated pages for birthday parties and corporate team building",
        details: Some(TemplateDetails {
            page_type: Some("service"),
            content: &[
                "Party package details and pricing",
                "Corporate booking inquiry form",
                "Group size options",
                "Catering/add-on options",
            ],
            design: &[
                "Clear package comparison",
                "Easy inquiry flow",
                "Corporate testimonials",
            ],
            ..TemplateDetails::EMPTY
        }),
        impact: ExpectedImpact::new(Medium, High, Medium, Medium),
        effort: EffortLevel::Medium,
        insight_type: InsightType::ConversionGap,
    },
    InsightTemplate {
        rule_id: "online_scheduling",
        title: "Implement Online Scheduling",
        problem: "Missing online appointment scheduling that competitors offer",
        hypothesis: "Online scheduling reduces phone friction and increases bookings",
        spec_change: "Implement online appointment scheduling with calendar integration",
        details: Some(TemplateDetails {
            component: Some("SchedulingWidget"),
            content: &[
                "Real-time availability",
                "Service type selection",
                "Provider selection",
                "New/existing patient flow",
            ],
            ..TemplateDetails::EMPTY
        }),
        impact: ExpectedImpact::new(NoImpact, High, Medium, High),
        effort: EffortLevel::Medium,
        insight_type: InsightType::ConversionGap,
    },
    InsightTemplate {
        rule_id: "credential_display",
        title: "Display Provider Credentials",
        problem: "Provider credentials not prominently displayed",
        hypothesis: "Visible credentials build trust and reduce decision anxiety",
        spec_change: "Create provider profile pages with credentials and certifications",
        details: Some(TemplateDetails {
            page_type: Some("about"),
            content: &[
                "Provider photos and bios",
                "Board certifications",
                "Years of experience",
                "Education background",
            ],
            ..TemplateDetails::EMPTY
        }),
        impact: ExpectedImpact::new(Low, Medium, High, Medium),
        effort: EffortLevel::Low,
        insight_type: InsightType::TrustGap,
    },
];

#[must_use]
pub fn template_for(rule_id: &str) -> Option<&'static InsightTemplate> {
    TEMPLATES.iter().find(|t| t.rule_id == rule_id)
}
