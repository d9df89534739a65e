/// Hand-written instructions for the style-transfer presets.
const STYLE_PRESETS: [(&str, &str); 10] = [
    (
        "oil-painting",
        "Transform this image into a classic oil painting style with visible brush strokes and rich colors.",
    ),
    (
        "watercolor",
        "Convert this image into a delicate watercolor painting with soft edges and flowing colors.",
    ),
    (
        "cyberpunk",
        "Transform this image into a cyberpunk aesthetic with neon lights and futuristic elements.",
    ),
    (
        "anime",
        "Convert this image into high-quality anime style with clean lines and cel shading.",
    ),
    (
        "pixel-art",
        "Transform this image into retro pixel art style with visible pixels and limited color palette.",
    ),
    (
        "sketch",
        "Convert this image into a detailed pencil sketch with careful shading.",
    ),
    (
        "pop-art",
        "Transform this image into bold pop art style with bright contrasting colors.",
    ),
    (
        "vaporwave",
        "Convert this image into vaporwave aesthetic with pink and blue gradients.",
    ),
    (
        "studio-ghibli",
        "Transform this image into Studio Ghibli animation style with soft, whimsical colors.",
    ),
    (
        "van-gogh",
        "Convert this image into Vincent van Gogh's post-impressionist style with swirling brush strokes.",
    ),
];

pub fn preset_instruction(style: &str) -> Option<&'static str> {
    STYLE_PRESETS
        .iter()
        .find(|(id, _)| *id == style)
        .map(|(_, instruction)| *instruction)
}

pub fn available_styles() -> Vec<&'static str> {
    STYLE_PRESETS.iter().map(|(id, _)| *id).collect()
}
