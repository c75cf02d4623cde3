//! Built-in layouts addressable by name.

/// A narrow four-bot maze with a single corridor per side.
const NARROW: &str = "
    ##################
    #0#.  .  # .     #
    #2#####    #####1#
    #     . #  .  .#3#
    ##################";

/// An open four-bot arena with pillars and food spread across both halves.
const COURTYARD: &str = "
    ####################
    #0 .  #  .   #.   1#
    #  ## . #  # . ## .#
    #. #  .   .    #  .#
    #. #    .   .  #  .#
    #. ## . #  # . ##  #
    #2   .#   .  #  . 3#
    ####################";

/// A wide four-bot maze with long winding corridors.
const SPIRAL: &str = "
    ##############################
    #0    .   .  #      .     . 1#
    # ######### .# ########## ## #
    # #.     .# ## #.       # #. #
    # # ##### #    # ##.##  #  . #
    # # #.  # ## .   #   #  ## # #
    #2  # . .    ## .# . # ..   3#
    ##############################";

const LAYOUTS: [(&str, &str); 3] = [
    ("narrow", NARROW),
    ("courtyard", COURTYARD),
    ("spiral", SPIRAL),
];

/// Looks up a built-in layout by name.
#[must_use]
pub fn by_name(name: &str) -> Option<&'static str> {
    LAYOUTS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, layout)| *layout)
}

/// Names of every built-in layout in a stable order.
#[must_use]
pub fn names() -> Vec<&'static str> {
    LAYOUTS.iter().map(|(name, _)| *name).collect()
}
