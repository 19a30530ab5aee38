//! Starter content for an empty database.

use atelier_schema::{Category, ComponentExample, Installation, UsagePrompts, UseCase, VariantGroups};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;

use crate::db::{ComponentCreate, ComponentFilter, DbActorHandle, ThemeCreate};
use crate::error::AtelierError;

const LIGHT_COLORS: &[(&str, &str)] = &[
    ("background", "#ffffff"),
    ("foreground", "#0a0a0a"),
    ("card", "#ffffff"),
    ("card-foreground", "#0a0a0a"),
    ("popover", "#ffffff"),
    ("popover-foreground", "#0a0a0a"),
    ("primary", "#2563eb"),
    ("primary-foreground", "#f8fafc"),
    ("primary-hover", "#1d4ed8"),
    ("primary-active", "#1e40af"),
    ("secondary", "#f1f5f9"),
    ("secondary-foreground", "#0f172a"),
    ("secondary-hover", "#e2e8f0"),
    ("secondary-active", "#cbd5e1"),
    ("muted", "#f1f5f9"),
    ("muted-foreground", "#64748b"),
    ("accent", "#f1f5f9"),
    ("accent-foreground", "#0f172a"),
    ("destructive", "#ef4444"),
    ("destructive-foreground", "#f8fafc"),
    ("destructive-hover", "#dc2626"),
    ("success", "#10b981"),
    ("success-foreground", "#f8fafc"),
    ("border", "#e2e8f0"),
    ("input", "#e2e8f0"),
    ("ring", "#2563eb"),
];

const DARK_COLORS: &[(&str, &str)] = &[
    ("background", "#0a0a0a"),
    ("foreground", "#fafafa"),
    ("card", "#171717"),
    ("card-foreground", "#fafafa"),
    ("popover", "#171717"),
    ("popover-foreground", "#fafafa"),
    ("primary", "#3b82f6"),
    ("primary-foreground", "#0a0a0a"),
    ("primary-hover", "#2563eb"),
    ("primary-active", "#1d4ed8"),
    ("secondary", "#262626"),
    ("secondary-foreground", "#fafafa"),
    ("secondary-hover", "#404040"),
    ("secondary-active", "#525252"),
    ("muted", "#262626"),
    ("muted-foreground", "#a3a3a3"),
    ("accent", "#262626"),
    ("accent-foreground", "#fafafa"),
    ("destructive", "#ef4444"),
    ("destructive-foreground", "#fafafa"),
    ("destructive-hover", "#dc2626"),
    ("success", "#10b981"),
    ("success-foreground", "#0a0a0a"),
    ("border", "#262626"),
    ("input", "#262626"),
    ("ring", "#3b82f6"),
];

const BUTTON_CODE: &str = r#""use client"

import * as React from "react"
import { Slot } from "@radix-ui/react-slot"
import { cva, type VariantProps } from "class-variance-authority"
import { cn } from "@/lib/utils"

const buttonVariants = cva(
  "inline-flex items-center justify-center gap-2 whitespace-nowrap rounded-md text-sm font-medium transition-colors focus-visible:outline-none focus-visible:ring-2 focus-visible:ring-ring disabled:pointer-events-none disabled:opacity-50",
  {
    variants: {
      variant: {
        default: "bg-primary text-primary-foreground hover:bg-primary-hover active:bg-primary-active",
        secondary: "bg-secondary text-secondary-foreground hover:bg-secondary-hover active:bg-secondary-active",
        destructive: "bg-destructive text-destructive-foreground hover:bg-destructive-hover",
        ghost: "hover:bg-accent hover:text-accent-foreground",
        link: "text-primary underline-offset-4 hover:underline",
      },
      size: {
        sm: "h-9 px-3",
        default: "h-10 px-4 py-2",
        lg: "h-11 px-8",
        icon: "h-10 w-10",
      },
    },
    defaultVariants: {
      variant: "default",
      size: "default",
    },
  }
)

export interface ButtonProps
  extends React.ButtonHTMLAttributes<HTMLButtonElement>,
    VariantProps<typeof buttonVariants> {
  asChild?: boolean
}

const Button = React.forwardRef<HTMLButtonElement, ButtonProps>(
  ({ className, variant, size, asChild = false, ...props }, ref) => {
    const Comp = asChild ? Slot : "button"
    return (
      <Comp
        className={cn(buttonVariants({ variant, size, className }))}
        ref={ref}
        {...props}
      />
    )
  }
)
Button.displayName = "Button"

export { Button, buttonVariants }
"#;

fn colors(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn light_theme() -> ThemeCreate {
    ThemeCreate {
        name: "Light".to_string(),
        value: "light".to_string(),
        colors: colors(LIGHT_COLORS),
        is_active: true,
        ..Default::default()
    }
}

pub fn dark_theme() -> ThemeCreate {
    ThemeCreate {
        name: "Dark".to_string(),
        value: "dark".to_string(),
        colors: colors(DARK_COLORS),
        is_active: false,
        ..Default::default()
    }
}

pub fn sample_button() -> ComponentCreate {
    let variants = VariantGroups::from([
        (
            "variant".to_string(),
            strings(&["default", "secondary", "destructive", "ghost", "link"]),
        ),
        ("size".to_string(), strings(&["sm", "default", "lg", "icon"])),
    ]);

    ComponentCreate {
        name: "Button".to_string(),
        slug: Some("button".to_string()),
        description:
            "A customizable button component with multiple variants for different use cases."
                .to_string(),
        category: Category::Buttons,
        code: BUTTON_CODE.to_string(),
        props: json!([
            { "name": "variant", "type": "\"default\" | \"secondary\" | \"destructive\" | \"ghost\" | \"link\"", "required": false, "description": "The visual style variant", "default": "default" },
            { "name": "size", "type": "\"sm\" | \"default\" | \"lg\" | \"icon\"", "required": false, "description": "The size of the button", "default": "default" },
            { "name": "asChild", "type": "boolean", "required": false, "description": "Render the child element instead of a button", "default": "false" },
            { "name": "disabled", "type": "boolean", "required": false, "description": "Whether the button is disabled", "default": "false" }
        ]),
        variants,
        prompts: UsagePrompts {
            basic: strings(&[
                "Give me a button",
                "Create a secondary button",
                "Show me a destructive button",
                "Generate a ghost button",
            ]),
            advanced: strings(&[
                "Create a large default button for a hero section",
                "Make a small secondary button for a form footer",
                "Generate an icon-sized ghost button for a toolbar",
            ]),
            use_cases: vec![UseCase {
                scenario: "Hero Section CTA".to_string(),
                prompt: "Create primary and secondary buttons for a hero".to_string(),
                output: "<Button size=\"lg\">Get started</Button>\n<Button size=\"lg\" variant=\"secondary\">Learn more</Button>".to_string(),
            }],
        },
        examples: vec![
            ComponentExample {
                name: "Default".to_string(),
                code: "<Button>Click me</Button>".to_string(),
            },
            ComponentExample {
                name: "Destructive".to_string(),
                code: "<Button variant=\"destructive\">Delete</Button>".to_string(),
            },
        ],
        installation: Installation {
            dependencies: strings(&[
                "@radix-ui/react-slot",
                "class-variance-authority",
                "clsx",
                "tailwind-merge",
            ]),
            setup_steps: strings(&[
                "Install the dependencies",
                "Add the cn() helper to lib/utils.ts",
                "Copy the component into components/ui/button.tsx",
            ]),
        },
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub themes: usize,
    pub components: usize,
}

/// Inserts the starter themes and component. Tables that already hold rows are left alone.
pub async fn seed(db: &DbActorHandle) -> Result<SeedReport, AtelierError> {
    let mut report = SeedReport::default();

    if db.list_themes().await?.is_empty() {
        for theme in [light_theme(), dark_theme()] {
            let row = db.create_theme(theme).await?;
            info!(theme = %row.value, active = row.is_active, "seeded theme");
            report.themes += 1;
        }
    } else {
        info!("themes table not empty, skipping theme seed");
    }

    let existing = db
        .list_components(ComponentFilter {
            category: None,
            limit: 1,
        })
        .await?;
    if existing.is_empty() {
        let row = db.create_component(sample_button()).await?;
        info!(component = %row.slug, "seeded component");
        report.components += 1;
    } else {
        info!("components table not empty, skipping component seed");
    }

    Ok(report)
}
